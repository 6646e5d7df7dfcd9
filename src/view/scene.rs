/// Declarative scene description produced by the screen renderers.
///
/// A scene is a flat arena of nodes in paint order, addressed by `NodeId`.
/// It carries no terminal types; `ui::renderer` maps tones to colors and
/// node kinds to glyphs.

use crate::view::geometry::Rect;
use crate::view::registry::ElementRef;
use crate::view::text;

/// Semantic color roles.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tone {
    Normal,
    Muted,
    Title,
    Accent,
    ActiveTurn,
    Dead,
    Hp,
    Mp,
    Sp,
    BarEmpty,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Weight {
    Regular,
    Bold,
    Italic,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Align {
    Left,
    Center,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Wrapped text. `content` keeps the unwrapped source for lookups.
#[derive(Clone, PartialEq, Debug)]
pub struct Label {
    pub rect: Rect,
    pub content: String,
    pub lines: Vec<String>,
    pub tone: Tone,
    pub weight: Weight,
    pub align: Align,
}

impl Label {
    pub fn new(rect: Rect, content: impl Into<String>) -> Self {
        let content = content.into();
        let lines = text::wrap(&content, rect.w.max(1) as usize);
        Label {
            rect,
            content,
            lines,
            tone: Tone::Normal,
            weight: Weight::Regular,
            align: Align::Left,
        }
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn weight(mut self, weight: Weight) -> Self {
        self.weight = weight;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum Node {
    Panel {
        rect: Rect,
        border: Tone,
        /// Set when the panel doubles as an interactive character box.
        element: Option<ElementRef>,
    },
    Label(Label),
    Portrait {
        rect: Rect,
        url: Option<String>,
        dead: bool,
        mirrored: bool,
    },
    Bar {
        rect: Rect,
        ratio: f32,
        tone: Tone,
    },
    Marker {
        rect: Rect,
        filled: bool,
    },
    Button {
        rect: Rect,
        lines: Vec<String>,
        element: ElementRef,
    },
    /// Text entry box; its content lives in the session, not the scene.
    Field {
        rect: Rect,
    },
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Scene {
    pub background: Option<String>,
    pub nodes: Vec<Node>,
}

impl Scene {
    pub fn new(background: Option<String>) -> Self {
        Scene { background, nodes: Vec::new() }
    }

    pub fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn label(&mut self, label: Label) -> NodeId {
        self.push(Node::Label(label))
    }

    pub fn label_mut(&mut self, id: NodeId) -> Option<&mut Label> {
        match self.nodes.get_mut(id.0) {
            Some(Node::Label(l)) => Some(l),
            _ => None,
        }
    }

    pub fn buttons(&self) -> impl Iterator<Item = (&Rect, &[String], ElementRef)> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Button { rect, lines, element } => Some((rect, lines.as_slice(), *element)),
            _ => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Label(l) => Some(l),
            _ => None,
        })
    }

    pub fn portraits(&self) -> impl Iterator<Item = (&Rect, Option<&str>, bool, bool)> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Portrait { rect, url, dead, mirrored } => Some((rect, url.as_deref(), *dead, *mirrored)),
            _ => None,
        })
    }

    /// True if any label carries exactly `content`.
    pub fn has_text(&self, content: &str) -> bool {
        self.labels().any(|l| l.content == content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_wraps_to_its_width() {
        let l = Label::new(Rect::new(5, 0, 9, 3), "the quick brown fox");
        assert_eq!(l.lines, vec!["the quick", "brown fox"]);
        assert_eq!(l.content, "the quick brown fox");
    }

    #[test]
    fn arena_ids_are_positions() {
        let mut s = Scene::new(None);
        let a = s.push(Node::Field { rect: Rect::default() });
        let b = s.label(Label::new(Rect::new(0, 0, 4, 1), "hi"));
        assert_eq!(a, NodeId(0));
        assert_eq!(b, NodeId(1));
        assert!(s.label_mut(a).is_none());
        s.label_mut(b).unwrap().weight = Weight::Bold;
        assert!(s.has_text("hi"));
        assert_eq!(s.labels().next().map(|l| l.weight), Some(Weight::Bold));
    }
}
