//! The slice of the browser the motion layer needs.
//!
//! Everything the controller does to the page goes through [`Surface`], so the
//! effects can be driven against the live DOM or an in-memory fake.

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Pointer position relative to the centre of the rect.
    pub fn offset_from_center(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.left - self.width / 2.0, y - self.top - self.height / 2.0)
    }
}

pub trait Surface {
    type Node: Clone + PartialEq;

    /// All elements matching a CSS selector, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;
    fn query_within(&self, scope: &Self::Node, selector: &str) -> Vec<Self::Node>;
    fn by_id(&self, id: &str) -> Option<Self::Node>;

    /// Bounding box relative to the viewport.
    fn rect(&self, node: &Self::Node) -> Rect;
    fn viewport(&self) -> (f64, f64);
    fn scroll_y(&self) -> f64;
    fn document_height(&self) -> f64;
    fn scroll_to(&self, y: f64);

    fn computed_opacity(&self, node: &Self::Node) -> f64;
    fn computed_transform(&self, node: &Self::Node) -> String;
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    fn text(&self, node: &Self::Node) -> String;
    fn set_text(&self, node: &Self::Node, text: &str);
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);
    fn toggle_class(&self, node: &Self::Node, class: &str);

    /// Current value of the form control with the given id.
    fn field_value(&self, id: &str) -> Option<String>;
    /// Opens `url` in a new browsing context.
    fn open_url(&self, url: &str);
    fn prefers_reduced_motion(&self) -> bool;
}
