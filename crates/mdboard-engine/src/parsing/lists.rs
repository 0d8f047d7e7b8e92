//! Nested-list reconstruction.
//!
//! The block parser emits list items as a flat, indentation-leveled stream.
//! This module rebuilds the tree: an item at level L attaches under the
//! nearest preceding item at a shallower level, and items with no shallower
//! predecessor become roots.

use crate::ast::Node;

/// One list-item declaration as seen by the line parser, before nesting.
#[derive(Debug)]
pub(crate) struct FlatItem {
    /// `floor(leading_spaces / 2)`.
    pub level: usize,
    pub ordered: bool,
    pub checked: Option<bool>,
    pub children: Vec<Node>,
}

#[derive(Debug)]
struct Frame {
    level: usize,
    ordered: bool,
    items: Vec<Node>,
}

/// Rebuilds a flat item stream into a single `List` node.
///
/// The ordered flag of each (sub)list comes from its first item. An item
/// deeper than its predecessor opens a new frame; closing a frame attaches
/// the finished sublist to the last item of the frame below.
pub(crate) fn nest_items(items: Vec<FlatItem>) -> Node {
    let mut stack: Vec<Frame> = vec![];

    for item in items {
        let node = Node::ListItem {
            children: item.children,
            checked: item.checked,
        };

        while stack.len() > 1 && stack.last().is_some_and(|f| f.level > item.level) {
            let popped = stack.pop().expect("len checked above");
            attach(&mut stack, popped);
        }

        match stack.last_mut() {
            Some(top) if item.level > top.level => stack.push(Frame {
                level: item.level,
                ordered: item.ordered,
                items: vec![node],
            }),
            Some(top) => {
                // An item shallower than everything so far re-roots the
                // list: earlier deeper items stay as its siblings.
                top.level = top.level.min(item.level);
                top.items.push(node);
            }
            None => stack.push(Frame {
                level: item.level,
                ordered: item.ordered,
                items: vec![node],
            }),
        }
    }

    while stack.len() > 1 {
        let popped = stack.pop().expect("len checked above");
        attach(&mut stack, popped);
    }

    let root = stack.pop().unwrap_or(Frame {
        level: 0,
        ordered: false,
        items: vec![],
    });
    Node::List {
        ordered: root.ordered,
        children: root.items,
    }
}

fn attach(stack: &mut Vec<Frame>, popped: Frame) {
    let list = Node::List {
        ordered: popped.ordered,
        children: popped.items,
    };
    let parent = stack.last_mut().expect("attach requires a parent frame");
    if let Some(Node::ListItem { children, .. }) = parent.items.last_mut() {
        children.push(list);
    } else {
        parent.items.push(list);
    }
}
