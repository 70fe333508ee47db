//! Element/connection store.
//!
//! [`DiagramStore`] holds the current [`Snapshot`] of a diagram. Reads go
//! through borrowing accessors; the only way to change anything is
//! [`DiagramStore::replace`], which swaps both collections at once so a
//! history snapshot never observes elements and connections out of step.
//!
//! The store does not validate. Keeping connections pointed at existing
//! elements is the editor's job when it deletes.

use procanvas_core::{
    geometry::Point,
    identifier::{ConnectionId, ElementId},
    model::{Connection, DiagramElement},
};

/// The element and connection collections at one point in time.
///
/// This is also the history entry type: the history stack keeps owned
/// copies and never mutates them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub elements: Vec<DiagramElement>,
    pub connections: Vec<Connection>,
}

impl Snapshot {
    pub fn new(elements: Vec<DiagramElement>, connections: Vec<Connection>) -> Self {
        Self {
            elements,
            connections,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.connections.is_empty()
    }

    pub fn element(&self, id: &ElementId) -> Option<&DiagramElement> {
        self.elements.iter().find(|element| element.id == *id)
    }

    pub fn element_mut(&mut self, id: &ElementId) -> Option<&mut DiagramElement> {
        self.elements.iter_mut().find(|element| element.id == *id)
    }

    pub fn connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|connection| connection.id == *id)
    }

    pub fn connection_mut(&mut self, id: &ConnectionId) -> Option<&mut Connection> {
        self.connections
            .iter_mut()
            .find(|connection| connection.id == *id)
    }

    /// Returns true if any element or connection already uses `id`.
    ///
    /// Element and connection ids share one namespace so exported XML never
    /// carries two nodes with the same `id` attribute.
    pub fn is_id_taken(&self, id: &str) -> bool {
        self.elements.iter().any(|element| element.id == id)
            || self
                .connections
                .iter()
                .any(|connection| connection.id == id)
    }

    /// Removes an element together with every connection touching it.
    ///
    /// Returns false, leaving the snapshot untouched, if no such element exists.
    pub fn remove_element_cascade(&mut self, id: &ElementId) -> bool {
        let before = self.elements.len();
        self.elements.retain(|element| element.id != *id);
        if self.elements.len() == before {
            return false;
        }
        self.connections
            .retain(|connection| !connection.references(id));
        true
    }
}

/// Holds the diagram currently being edited.
#[derive(Debug, Clone, Default)]
pub struct DiagramStore {
    current: Snapshot,
}

impl DiagramStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { current: snapshot }
    }

    pub fn elements(&self) -> &[DiagramElement] {
        &self.current.elements
    }

    pub fn connections(&self) -> &[Connection] {
        &self.current.connections
    }

    pub fn element(&self, id: &ElementId) -> Option<&DiagramElement> {
        self.current.element(id)
    }

    pub fn connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.current.connection(id)
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.current
    }

    /// Replaces both collections atomically.
    pub fn replace(&mut self, snapshot: Snapshot) {
        self.current = snapshot;
    }

    /// Returns the element under `point`, if any.
    ///
    /// Pools and lanes are drawn beneath everything else, so they are only
    /// hit when no other element is. Within each group the last element
    /// wins, matching paint order.
    pub fn hit_test(&self, point: Point) -> Option<&DiagramElement> {
        let hits = |containers: bool| {
            self.current
                .elements
                .iter()
                .rev()
                .filter(move |element| element.kind.is_container() == containers)
                .find(|element| element.bounds().contains(point))
        };
        hits(false).or_else(|| hits(true))
    }
}

#[cfg(test)]
mod tests {
    use procanvas_core::model::{ConnectionKind, ElementKind};

    use super::*;

    fn element(id: &str, kind: ElementKind, x: f32, y: f32) -> DiagramElement {
        DiagramElement::new(id.into(), kind, Point::new(x, y))
    }

    fn connection(id: &str, source: &str, target: &str) -> Connection {
        Connection::new(
            id.into(),
            source.into(),
            target.into(),
            ConnectionKind::SequenceFlow,
        )
    }

    fn three_in_a_row() -> Snapshot {
        Snapshot::new(
            vec![
                element("a", ElementKind::StartEvent, 0.0, 0.0),
                element("b", ElementKind::Task, 100.0, 0.0),
                element("c", ElementKind::EndEvent, 300.0, 0.0),
            ],
            vec![connection("ab", "a", "b"), connection("bc", "b", "c")],
        )
    }

    #[test]
    fn test_replace_swaps_both_collections() {
        let mut store = DiagramStore::default();
        assert!(store.snapshot().is_empty());

        store.replace(three_in_a_row());
        assert_eq!(store.elements().len(), 3);
        assert_eq!(store.connections().len(), 2);
        assert!(store.element(&"b".into()).is_some());
        assert!(store.connection(&"bc".into()).is_some());
    }

    #[test]
    fn test_remove_element_cascade() {
        let mut snapshot = three_in_a_row();
        assert!(snapshot.remove_element_cascade(&"b".into()));
        assert_eq!(snapshot.elements.len(), 2);
        assert!(snapshot.connections.is_empty());

        assert!(!snapshot.remove_element_cascade(&"missing".into()));
        assert_eq!(snapshot.elements.len(), 2);
    }

    #[test]
    fn test_is_id_taken_covers_both_namespaces() {
        let snapshot = three_in_a_row();
        assert!(snapshot.is_id_taken("a"));
        assert!(snapshot.is_id_taken("ab"));
        assert!(!snapshot.is_id_taken("zz"));
    }

    #[test]
    fn test_hit_test_prefers_topmost_element() {
        let mut snapshot = three_in_a_row();
        snapshot
            .elements
            .push(element("overlap", ElementKind::Task, 150.0, 10.0));
        let store = DiagramStore::new(snapshot);

        let hit = store.hit_test(Point::new(160.0, 20.0)).unwrap();
        assert_eq!(hit.id, "overlap");
        assert!(store.hit_test(Point::new(1000.0, 1000.0)).is_none());
    }

    #[test]
    fn test_hit_test_pool_only_when_nothing_else() {
        let mut snapshot = three_in_a_row();
        snapshot
            .elements
            .push(element("pool", ElementKind::Pool, -50.0, -50.0));
        let store = DiagramStore::new(snapshot);

        assert_eq!(store.hit_test(Point::new(120.0, 20.0)).unwrap().id, "b");
        assert_eq!(store.hit_test(Point::new(250.0, 120.0)).unwrap().id, "pool");
    }
}
