//! CLI logic for the Procanvas diagram tool.
//!
//! Every command reads a diagram file (JSON, or XML which loads the sample
//! diagram), runs it through the editing core and writes the result.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::{fs, path::Path};

use log::{info, warn};

use procanvas::{
    Editor, ImportError, ProcanvasError,
    config::AppConfig,
    export::{self, ExportFormat},
    interaction::EditorInput,
    render::CanvasRenderer,
    sample::sample_diagram,
    store::Snapshot,
    validate,
};

/// Run the Procanvas CLI application
///
/// # Errors
///
/// Returns `ProcanvasError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed diagram or script files
/// - Export errors
/// - Validation errors (the `validate` command only)
pub fn run(args: &Args) -> Result<(), ProcanvasError> {
    let app_config = config::load_config(args.config.as_ref())?;

    match &args.command {
        Command::Render {
            input,
            output,
            zoom,
        } => {
            let snapshot = read_diagram(input)?;
            let svg = procanvas::render_svg(&snapshot, &app_config, *zoom)?;
            fs::write(output, svg)?;
            info!(output_file = output; "SVG exported successfully");
        }
        Command::Export {
            input,
            format,
            output,
        } => {
            let snapshot = read_diagram(input)?;
            let output = match output {
                Some(output) => Path::new(output).to_path_buf(),
                None => Path::new(input).with_extension(format.extension()),
            };
            export::save(&snapshot, *format, &output)?;
        }
        Command::Validate { input } => {
            let snapshot = read_diagram(input)?;
            let warnings = validate::check(&snapshot)?;
            for issue in &warnings {
                warn!(kind:? = issue.kind, subject:? = issue.subject; "{}", issue.message);
            }
            info!(input, warnings = warnings.len(); "Diagram is valid");
        }
        Command::Replay {
            script,
            diagram,
            output,
            save,
        } => {
            let editor = replay(&app_config, script, diagram.as_deref())?;
            let svg = CanvasRenderer::new(&app_config)?.render_to_string(&editor.view());
            fs::write(output, svg)?;
            info!(output_file = output; "SVG exported successfully");

            if let Some(save) = save {
                export::save(editor.store().snapshot(), ExportFormat::Json, Path::new(save))?;
            }
        }
        Command::Sample { output, format } => {
            export::save(&sample_diagram(), *format, Path::new(output))?;
        }
    }

    Ok(())
}

/// Reads a diagram file in either supported format.
fn read_diagram(path: &str) -> Result<Snapshot, ProcanvasError> {
    info!(input_path = path; "Reading diagram");
    let text = fs::read_to_string(path)?;
    let snapshot = export::import(&text)?;
    Ok(snapshot)
}

/// Applies a script of editor inputs, starting from `diagram` if given.
fn replay(
    config: &AppConfig,
    script: &str,
    diagram: Option<&str>,
) -> Result<Editor, ProcanvasError> {
    let mut editor = Editor::new(config);
    if let Some(diagram) = diagram {
        editor.load(read_diagram(diagram)?);
    }

    info!(script_path = script; "Replaying script");
    let text = fs::read_to_string(script)?;
    let inputs: Vec<EditorInput> = serde_json::from_str(&text).map_err(ImportError::Json)?;

    let count = inputs.len();
    for input in inputs {
        editor.handle(input);
    }
    info!(
        inputs = count,
        elements = editor.store().elements().len(),
        connections = editor.store().connections().len(),
        history = editor.history().len();
        "Replay finished"
    );

    Ok(editor)
}
