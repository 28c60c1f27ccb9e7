// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Per-op mutation helpers used by `GraphStore`.
/// Each helper checks every precondition before its first write.
fn apply_op(
    graph: &mut Graph,
    ids: &mut dyn IdentifierSource,
    new_node_title: &str,
    op: &Op,
    delta: &mut DeltaBuilder,
) -> Result<Option<GraphRef>, ApplyError> {
    match op {
        Op::CreateNode { kind, position } => {
            let node_id = create_node(graph, ids, *kind, *position, new_node_title, delta);
            Ok(Some(GraphRef::Node(node_id)))
        }
        Op::DeleteNode { node_id } => {
            delete_node(graph, node_id, delta);
            Ok(None)
        }
        Op::UpdateNodeField { node_id, field } => {
            update_node_field(graph, node_id, field.clone(), delta).map(|()| None)
        }
        Op::MoveNode { node_id, position } => {
            move_node(graph, node_id, *position, delta).map(|()| None)
        }
        Op::CreateEdge { source, target } => create_edge(graph, ids, source, target, delta)
            .map(|edge_id| Some(GraphRef::Edge(edge_id))),
        Op::DeleteEdge { edge_id } => {
            delete_edge(graph, edge_id, delta);
            Ok(None)
        }
        Op::SwapEdge {
            edge_id,
            source,
            target,
        } => swap_edge_endpoint(graph, edge_id, source, target, delta).map(|()| None),
    }
}

fn fresh_id<T>(
    ids: &mut dyn IdentifierSource,
    taken: impl Fn(&crate::model::Id<T>) -> bool,
) -> crate::model::Id<T> {
    let base: crate::model::Id<T> = ids.next_token().retag();
    if !taken(&base) {
        return base;
    }

    tracing::warn!(id = %base, "identifier source returned a token already in use");
    let mut suffix = 2u64;
    loop {
        let candidate = crate::model::Id::<T>::new(format!("{base}-{suffix}"))
            .expect("suffixing a valid token keeps it valid");
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

fn create_node(
    graph: &mut Graph,
    ids: &mut dyn IdentifierSource,
    kind: NodeKind,
    position: Option<Position>,
    title: &str,
    delta: &mut DeltaBuilder,
) -> NodeId {
    let node_id: NodeId = fresh_id(ids, |candidate| graph.contains_node(candidate));
    let position = position.filter(|position| {
        let finite = position.is_finite();
        if !finite {
            tracing::warn!(node_id = %node_id, ?position, "dropping non-finite position");
        }
        finite
    });
    let mut node = Node::new(kind, node_id.clone(), title);
    node.set_position(position);
    graph.push_node(node);

    tracing::debug!(node_id = %node_id, ?kind, "created node");
    delta.record_added(GraphRef::Node(node_id.clone()));
    node_id
}

fn delete_node(graph: &mut Graph, node_id: &NodeId, delta: &mut DeltaBuilder) -> bool {
    if graph.remove_node(node_id).is_none() {
        return false;
    }

    let removed_edges = graph.remove_edges_touching(node_id);
    let touched = index::reindex_after_node_deletion(graph, node_id, &removed_edges);

    tracing::debug!(
        node_id = %node_id,
        removed_edges = removed_edges.len(),
        reindexed = touched.len(),
        "deleted node"
    );
    for edge in removed_edges {
        delta.record_removed(GraphRef::Edge(edge.id().clone()));
    }
    for intent_id in touched {
        delta.record_updated(GraphRef::Node(intent_id));
    }
    delta.record_removed(GraphRef::Node(node_id.clone()));
    true
}

fn update_node_field(
    graph: &mut Graph,
    node_id: &NodeId,
    field: NodeField,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    let Some(node) = graph.node_mut(node_id) else {
        return Err(ApplyError::NodeNotFound {
            node_id: node_id.clone(),
        });
    };

    let field = match field {
        NodeField::Title(title) => {
            node.set_title(title);
            None
        }
        other => Some(other),
    };

    if let Some(field) = field {
        let Some(intent) = node.as_intent_mut() else {
            return Err(ApplyError::NotAnIntent {
                node_id: node_id.clone(),
                field: field.name(),
            });
        };
        match field {
            NodeField::Title(_) => {}
            NodeField::Events(events) => intent.set_events(events),
            NodeField::TrainingPhrases(phrases) => intent.set_training_phrases(phrases),
            NodeField::Action(action) => intent.set_action(action),
            NodeField::Payload(payload) => intent.set_payload(payload),
            NodeField::Responses(responses) => intent.set_responses(responses),
            NodeField::Fulfillment(fulfillment) => intent.set_fulfillment(fulfillment),
            NodeField::IsFallback(is_fallback) => intent.set_is_fallback(is_fallback),
        }
    }

    delta.record_updated(GraphRef::Node(node_id.clone()));
    Ok(())
}

fn move_node(
    graph: &mut Graph,
    node_id: &NodeId,
    position: Position,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    let Some(node) = graph.node_mut(node_id) else {
        return Err(ApplyError::NodeNotFound {
            node_id: node_id.clone(),
        });
    };
    if !position.is_finite() {
        return Err(ApplyError::NonFinitePosition {
            node_id: node_id.clone(),
        });
    }
    node.set_position(Some(position));
    delta.record_updated(GraphRef::Node(node_id.clone()));
    Ok(())
}

/// Resolves both endpoints of a proposed edge and runs the legality checks shared by
/// creation and reattachment. `ignore` excludes the edge being reattached from the
/// duplicate-pair check.
fn check_endpoints(
    graph: &Graph,
    source: &NodeId,
    target: &NodeId,
    ignore: Option<&EdgeId>,
    legal: impl FnOnce(&Node, &Node) -> bool,
) -> Result<index::ContextLink, ApplyError> {
    let illegal = |reason| ApplyError::IllegalEdge {
        source: source.clone(),
        target: target.clone(),
        reason,
    };

    if source == target {
        return Err(illegal(IllegalEdgeReason::SelfLoop));
    }
    let Some(source_node) = graph.node(source) else {
        return Err(ApplyError::NodeNotFound {
            node_id: source.clone(),
        });
    };
    let Some(target_node) = graph.node(target) else {
        return Err(ApplyError::NodeNotFound {
            node_id: target.clone(),
        });
    };
    if !legal(source_node, target_node) {
        return Err(illegal(IllegalEdgeReason::SameKind(source_node.kind())));
    }
    if let Some(existing) = graph
        .edges()
        .iter()
        .find(|edge| Some(edge.id()) != ignore && edge.same_pair(source, target))
    {
        return Err(illegal(IllegalEdgeReason::DuplicatePair {
            existing_edge_id: existing.id().clone(),
        }));
    }

    index::link_for(graph, source, target)
        .ok_or_else(|| illegal(IllegalEdgeReason::SameKind(source_node.kind())))
}

fn create_edge(
    graph: &mut Graph,
    ids: &mut dyn IdentifierSource,
    source: &NodeId,
    target: &NodeId,
    delta: &mut DeltaBuilder,
) -> Result<EdgeId, ApplyError> {
    let link = check_endpoints(graph, source, target, None, |source, target| {
        policy::can_create(Some(source), Some(target))
    })?;

    let edge_id: EdgeId = fresh_id(ids, |candidate| graph.contains_edge(candidate));
    graph.push_edge(Edge::new(edge_id.clone(), source.clone(), target.clone()));
    if index::apply_link(graph, &link) {
        delta.record_updated(GraphRef::Node(link.intent.clone()));
    }

    tracing::debug!(
        edge_id = %edge_id,
        source = %source,
        target = %target,
        direction = index::direction_key(link.direction),
        "created edge"
    );
    delta.record_added(GraphRef::Edge(edge_id.clone()));
    Ok(edge_id)
}

fn delete_edge(graph: &mut Graph, edge_id: &EdgeId, delta: &mut DeltaBuilder) -> bool {
    let Some(edge) = graph.remove_edge(edge_id) else {
        return false;
    };

    if let Some(link) = index::link_for(graph, edge.source(), edge.target()) {
        if index::drop_link(graph, &link) {
            delta.record_updated(GraphRef::Node(link.intent));
        }
    }

    tracing::debug!(edge_id = %edge_id, "deleted edge");
    delta.record_removed(GraphRef::Edge(edge_id.clone()));
    true
}

fn swap_edge_endpoint(
    graph: &mut Graph,
    edge_id: &EdgeId,
    source: &NodeId,
    target: &NodeId,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    let Some(edge) = graph.edge(edge_id) else {
        return Err(ApplyError::EdgeNotFound {
            edge_id: edge_id.clone(),
        });
    };
    let (old_source, old_target) = (edge.source().clone(), edge.target().clone());

    let new_link = check_endpoints(graph, source, target, Some(edge_id), |source, target| {
        graph
            .edge(edge_id)
            .is_some_and(|edge| policy::can_swap(Some(source), Some(target), edge))
    })?;

    if &old_source == source && &old_target == target {
        return Ok(());
    }

    // The entry to retract is the one the old endpoints implied, never one re-derived from
    // the new endpoints.
    let old_link = index::link_for(graph, &old_source, &old_target);

    if let Some(edge) = graph.edge_mut(edge_id) {
        edge.set_endpoints(source.clone(), target.clone());
    }
    if let Some(old_link) = &old_link {
        if index::drop_link(graph, old_link) {
            delta.record_updated(GraphRef::Node(old_link.intent.clone()));
        }
    }
    if index::apply_link(graph, &new_link) {
        delta.record_updated(GraphRef::Node(new_link.intent.clone()));
    }

    tracing::debug!(
        edge_id = %edge_id,
        from = %format_args!("{old_source} -> {old_target}"),
        to = %format_args!("{source} -> {target}"),
        "reattached edge"
    );
    delta.record_updated(GraphRef::Edge(edge_id.clone()));
    Ok(())
}
