//! End-to-end scenarios spanning parsing, selection, and cascade (spec §8).

use csscade::color::Color;
use csscade::handler::SelectionHandler;
use csscade::length::Length;
use csscade::rule::Origin;
use csscade::{parse_stylesheet, Atom, CssEngine, CssError, MediaMask, SelectionContext};

#[derive(Clone)]
struct Node {
    name: &'static str,
    id: Option<&'static str>,
    classes: Vec<&'static str>,
}

impl Node {
    fn new(name: &'static str) -> Self {
        Node { name, id: None, classes: Vec::new() }
    }

    fn with_id(mut self, id: &'static str) -> Self {
        self.id = Some(id);
        self
    }

    fn with_class(mut self, class: &'static str) -> Self {
        self.classes.push(class);
        self
    }
}

struct Handler;

impl SelectionHandler for Handler {
    type Node = Node;

    fn node_name(&self, node: &Node) -> Atom {
        Atom::from_str(node.name)
    }

    fn node_id(&self, node: &Node) -> Option<Atom> {
        node.id.map(Atom::from_str)
    }

    fn node_classes(&self, node: &Node) -> Vec<Atom> {
        node.classes.iter().map(|c| Atom::from_str(c)).collect()
    }

    fn compute_font_size(&self, _node: &Node, specified: Length, parent_font_size_px: f32) -> f32 {
        specified.to_px(parent_font_size_px, None).value()
    }
}

#[test]
fn scenario_1_simple_color_declaration() {
    let sheet = parse_stylesheet("p { color: red; }", Origin::Author);
    let handler = Handler;
    let ctx = SelectionContext::new(&handler, vec![&sheet]);
    let style = ctx.select_style(&Node::new("p"), None, true);
    assert_eq!(style.color, Color::from_rgba(0xFF, 0, 0, 0xFF));
}

#[test]
fn scenario_2_id_beats_class() {
    let sheet = parse_stylesheet("#a { color: red } .b { color: blue }", Origin::Author);
    let handler = Handler;
    let ctx = SelectionContext::new(&handler, vec![&sheet]);
    let node = Node::new("span").with_id("a").with_class("b");
    let style = ctx.select_style(&node, None, true);
    assert_eq!(style.color, Color::from_rgba(0xFF, 0, 0, 0xFF));
}

#[test]
fn scenario_3_important_wins_over_later_declaration() {
    let sheet = parse_stylesheet("p { color: red !important } p { color: blue }", Origin::Author);
    let handler = Handler;
    let ctx = SelectionContext::new(&handler, vec![&sheet]);
    let style = ctx.select_style(&Node::new("p"), None, true);
    assert_eq!(style.color, Color::from_rgba(0xFF, 0, 0, 0xFF));
}

#[test]
fn scenario_4_out_of_order_charset_is_dropped_and_import_stays_pending() {
    let engine = CssEngine::new();
    let mut sheet = engine.create_stylesheet(Origin::Author, None, None, false);
    engine
        .append_data(&mut sheet, b"@import url(\"x.css\") screen; @charset \"utf-8\";")
        .unwrap();

    // The misplaced @charset is discarded; only the @import survives.
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(engine.data_done(&sheet), Err(CssError::ImportsPending));

    let (url, media) = sheet.next_pending_import().unwrap();
    assert_eq!(url, "x.css");
    assert!(media.intersects(MediaMask::SCREEN));
}

#[test]
fn scenario_5_em_font_size_resolves_against_parent() {
    let sheet = parse_stylesheet("p { font-size: 1.5em; }", Origin::Author);
    let handler = Handler;
    let ctx = SelectionContext::new(&handler, vec![&sheet]);

    let mut parent = csscade::ComputedStyle::initial();
    parent.font_size = Length::new(16.0, csscade::Unit::Px);

    let style = ctx.select_style(&Node::new("p"), Some(&parent), false);
    assert!((style.font_size.value() - 24.0).abs() < 0.01);
    assert_eq!(style.font_size.unit, csscade::Unit::Px);
}
