// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Edge legality rules.
//!
//! Both predicates are pure. A missing endpoint is allowed so that an in-progress drag can
//! be previewed before its target is known; committing operations resolve both endpoints
//! first and never pass `None`.

use crate::model::{Edge, Node};

/// May a new edge join `source` and `target`?
pub fn can_create(source: Option<&Node>, target: Option<&Node>) -> bool {
    match (source, target) {
        (Some(source), Some(target)) => source.kind() != target.kind(),
        _ => true,
    }
}

/// May `edge` be reattached to `source` and `target`?
pub fn can_swap(source: Option<&Node>, target: Option<&Node>, _edge: &Edge) -> bool {
    can_create(source, target)
}
