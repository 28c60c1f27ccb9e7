// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::graph::{Edge, Graph};
use super::ids::{EdgeId, NodeId};
use super::node::{ContextLinks, ContextNode, IntentNode, Position};

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("hard-coded node id is valid")
}

fn eid(value: &str) -> EdgeId {
    EdgeId::new(value).expect("hard-coded edge id is valid")
}

/// The starter graph shown when nothing has been saved yet.
///
/// `ctx-start -> intent-welcome -> ctx-awaiting-name`, plus an unconnected fallback
/// intent. The context index of the welcome intent mirrors both edges.
pub fn default_graph() -> Graph {
    let ctx_start = nid("ctx-start");
    let ctx_awaiting_name = nid("ctx-awaiting-name");
    let welcome = nid("intent-welcome");
    let fallback = nid("intent-fallback");

    let mut start = ContextNode::new(ctx_start.clone(), "start");
    start.set_position(Some(Position::new(0.0, 0.0)));

    let mut awaiting_name = ContextNode::new(ctx_awaiting_name.clone(), "awaiting-name");
    awaiting_name.set_position(Some(Position::new(400.0, 0.0)));

    let mut welcome_intent = IntentNode::new(welcome.clone(), "Default Welcome Intent")
        .with_contexts(ContextLinks::from_lists(
            [ctx_start.clone()],
            [ctx_awaiting_name.clone()],
        ));
    welcome_intent.set_position(Some(Position::new(200.0, 0.0)));
    welcome_intent.set_events(vec!["WELCOME".to_owned()]);
    welcome_intent.set_training_phrases(vec!["hi".to_owned(), "hello".to_owned()]);
    welcome_intent.set_action("input.welcome".to_owned());
    welcome_intent.set_responses(vec![vec![
        "Hi! What's your name?".to_owned(),
        "Hello! Who am I talking to?".to_owned(),
    ]]);

    let mut fallback_intent = IntentNode::new(fallback, "Default Fallback Intent");
    fallback_intent.set_position(Some(Position::new(200.0, 200.0)));
    fallback_intent.set_action("input.unknown".to_owned());
    fallback_intent.set_responses(vec![vec!["Sorry, could you say that again?".to_owned()]]);
    fallback_intent.set_is_fallback(true);

    Graph::from_parts(
        vec![
            start.into(),
            welcome_intent.into(),
            awaiting_name.into(),
            fallback_intent.into(),
        ],
        vec![
            Edge::new(eid("edge-start-welcome"), ctx_start, welcome.clone()),
            Edge::new(eid("edge-welcome-awaiting-name"), welcome, ctx_awaiting_name),
        ],
    )
}

#[cfg(test)]
pub(crate) fn unlinked_pair() -> (Graph, NodeId, NodeId) {
    let context = nid("c1");
    let intent = nid("i1");
    let graph = Graph::from_parts(
        vec![
            ContextNode::new(context.clone(), "c1").into(),
            IntentNode::new(intent.clone(), "i1").into(),
        ],
        Vec::new(),
    );
    (graph, context, intent)
}

#[cfg(test)]
mod tests {
    use super::default_graph;
    use crate::ops::index::check_consistency;

    #[test]
    fn default_graph_is_consistent() {
        let graph = default_graph();
        assert_eq!(graph.nodes().len(), 4);
        assert_eq!(graph.edges().len(), 2);
        assert_eq!(check_consistency(&graph), Vec::new());
    }
}
