//! In-memory page used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

use crate::surface::{Rect, Surface};

#[derive(Debug, Clone)]
pub struct FakeNode {
    pub id: Option<String>,
    pub classes: BTreeSet<String>,
    pub styles: BTreeMap<String, String>,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub value: Option<String>,
    /// Position in document coordinates.
    pub rect: Rect,
    pub opacity: f64,
    pub transform: String,
}

impl FakeNode {
    pub fn new() -> Self {
        Self {
            id: None,
            classes: BTreeSet::new(),
            styles: BTreeMap::new(),
            attributes: BTreeMap::new(),
            text: String::new(),
            value: None,
            rect: Rect::default(),
            opacity: 1.0,
            transform: "none".to_string(),
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn at(mut self, left: f64, top: f64, width: f64, height: f64) -> Self {
        self.rect = Rect::new(left, top, width, height);
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.opacity = 0.0;
        self
    }

    pub fn transform(mut self, transform: &str) -> Self {
        self.transform = transform.to_string();
        self
    }
}

pub struct FakeSurface {
    nodes: RefCell<Vec<FakeNode>>,
    selectors: BTreeMap<String, Vec<usize>>,
    children: BTreeMap<(usize, String), Vec<usize>>,
    scroll: Cell<f64>,
    pub viewport: (f64, f64),
    pub document_height: f64,
    pub reduced_motion: bool,
    opened: RefCell<Vec<String>>,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(Vec::new()),
            selectors: BTreeMap::new(),
            children: BTreeMap::new(),
            scroll: Cell::new(0.0),
            viewport: (1280.0, 800.0),
            document_height: 4000.0,
            reduced_motion: false,
            opened: RefCell::new(Vec::new()),
        }
    }

    /// Adds a node reachable through each of `selectors`.
    pub fn add(&mut self, selectors: &[&str], node: FakeNode) -> usize {
        let index = {
            let mut nodes = self.nodes.borrow_mut();
            nodes.push(node);
            nodes.len() - 1
        };
        for selector in selectors {
            self.selectors.entry(selector.to_string()).or_default().push(index);
        }
        index
    }

    pub fn add_child(&mut self, parent: usize, selector: &str, node: FakeNode) -> usize {
        let index = self.add(&[], node);
        self.children
            .entry((parent, selector.to_string()))
            .or_default()
            .push(index);
        index
    }

    pub fn set_scroll(&self, y: f64) {
        self.scroll.set(y);
    }

    pub fn move_node(&self, node: usize, top: f64) {
        self.nodes.borrow_mut()[node].rect.top = top;
    }

    pub fn style(&self, node: usize, property: &str) -> Option<String> {
        self.nodes.borrow()[node].styles.get(property).cloned()
    }

    pub fn text_of(&self, node: usize) -> String {
        self.nodes.borrow()[node].text.clone()
    }

    pub fn has_class(&self, node: usize, class: &str) -> bool {
        self.nodes.borrow()[node].classes.contains(class)
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl Surface for FakeSurface {
    type Node = usize;

    fn query_all(&self, selector: &str) -> Vec<usize> {
        if let Some(found) = self.selectors.get(selector) {
            return found.clone();
        }
        let mut found: Vec<usize> = selector
            .split(',')
            .filter_map(|part| self.selectors.get(part.trim()))
            .flatten()
            .copied()
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }

    fn query_within(&self, scope: &usize, selector: &str) -> Vec<usize> {
        self.children
            .get(&(*scope, selector.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    fn by_id(&self, id: &str) -> Option<usize> {
        self.nodes
            .borrow()
            .iter()
            .position(|node| node.id.as_deref() == Some(id))
    }

    fn rect(&self, node: &usize) -> Rect {
        let mut rect = self.nodes.borrow()[*node].rect;
        rect.top -= self.scroll.get();
        rect
    }

    fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    fn scroll_y(&self) -> f64 {
        self.scroll.get()
    }

    fn document_height(&self) -> f64 {
        self.document_height
    }

    fn scroll_to(&self, y: f64) {
        self.scroll.set(y);
    }

    fn computed_opacity(&self, node: &usize) -> f64 {
        self.nodes.borrow()[*node].opacity
    }

    fn computed_transform(&self, node: &usize) -> String {
        self.nodes.borrow()[*node].transform.clone()
    }

    fn set_style(&self, node: &usize, property: &str, value: &str) {
        self.nodes.borrow_mut()[*node]
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn text(&self, node: &usize) -> String {
        self.text_of(*node)
    }

    fn set_text(&self, node: &usize, text: &str) {
        self.nodes.borrow_mut()[*node].text = text.to_string();
    }

    fn attribute(&self, node: &usize, name: &str) -> Option<String> {
        self.nodes.borrow()[*node].attributes.get(name).cloned()
    }

    fn add_class(&self, node: &usize, class: &str) {
        self.nodes.borrow_mut()[*node].classes.insert(class.to_string());
    }

    fn remove_class(&self, node: &usize, class: &str) {
        self.nodes.borrow_mut()[*node].classes.remove(class);
    }

    fn toggle_class(&self, node: &usize, class: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let classes = &mut nodes[*node].classes;
        if !classes.remove(class) {
            classes.insert(class.to_string());
        }
    }

    fn field_value(&self, id: &str) -> Option<String> {
        let index = self.by_id(id)?;
        self.nodes.borrow()[index].value.clone()
    }

    fn open_url(&self, url: &str) {
        self.opened.borrow_mut().push(url.to_string());
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}
