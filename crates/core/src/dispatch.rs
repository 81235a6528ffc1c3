// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Action routing table.
//!
//! Each [`ActionType`] maps to one [`Route`]: an HTTP method, a path template
//! and whether session credentials are required. Supporting a new kind of
//! action means adding a payload variant and a row to [`ROUTES`]; the drain
//! loop never changes.
//!
//! | type | method | path |
//! |---|---|---|
//! | CREATE_SHIPMENT | POST | `/api/shipments` |
//! | UPDATE_STATUS | PUT | `/api/shipments/{shipmentId}/status` |
//! | ADD_DOCUMENT | POST | `/api/shipments/{shipmentId}/documents` |
//! | ADD_EXPENSE | POST | `/api/shipments/{shipmentId}/expenses` |
//! | PAY_LIQUIDATION | POST | `/api/shipments/{shipmentId}/pay-liquidation` |
//! | UPDATE_ARRIVAL_DATE | PUT | `/api/shipments/{shipmentId}/arrival-date` |
//! | SET_DECLARATION | PUT | `/api/shipments/{shipmentId}/declaration` |
//! | UPDATE_SHIPMENT | PUT | `/api/shipments/{shipmentId}` |

use crate::action::{Action, ActionType};
use crate::error::{Error, Result};
use crate::transport::{Method, Request};

/// Placeholder substituted with the action's shipment id.
const SHIPMENT_ID: &str = "{shipmentId}";

/// One row of the routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub action_type: ActionType,
    pub method: Method,
    pub path: &'static str,
    pub credentials: bool,
}

const fn route(action_type: ActionType, method: Method, path: &'static str) -> Route {
    Route {
        action_type,
        method,
        path,
        credentials: false,
    }
}

/// The routing table.
pub const ROUTES: &[Route] = &[
    route(ActionType::CreateShipment, Method::Post, "/api/shipments"),
    route(
        ActionType::UpdateStatus,
        Method::Put,
        "/api/shipments/{shipmentId}/status",
    ),
    route(
        ActionType::AddDocument,
        Method::Post,
        "/api/shipments/{shipmentId}/documents",
    ),
    route(
        ActionType::AddExpense,
        Method::Post,
        "/api/shipments/{shipmentId}/expenses",
    ),
    Route {
        credentials: true,
        ..route(
            ActionType::PayLiquidation,
            Method::Post,
            "/api/shipments/{shipmentId}/pay-liquidation",
        )
    },
    route(
        ActionType::UpdateArrivalDate,
        Method::Put,
        "/api/shipments/{shipmentId}/arrival-date",
    ),
    route(
        ActionType::SetDeclaration,
        Method::Put,
        "/api/shipments/{shipmentId}/declaration",
    ),
    route(
        ActionType::UpdateShipment,
        Method::Put,
        "/api/shipments/{shipmentId}",
    ),
];

/// Resolves queued actions into remote requests.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    routes: &'static [Route],
}

impl Default for Dispatcher {
    fn default() -> Self {
        Dispatcher { routes: ROUTES }
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The route registered for an action type.
    pub fn route(&self, action_type: ActionType) -> Option<&'static Route> {
        self.routes.iter().find(|r| r.action_type == action_type)
    }

    /// Build the request that delivers `action`.
    pub fn resolve(&self, action: &Action) -> Result<Request> {
        let action_type = action.action_type();
        let route = self.route(action_type).ok_or_else(|| {
            Error::invalid_payload(action_type, "no route registered for this action type")
        })?;

        let path = match action.shipment_id() {
            Some(id) => route.path.replace(SHIPMENT_ID, &encode_segment(id)),
            None => route.path.to_string(),
        };
        if path.contains(SHIPMENT_ID) {
            return Err(Error::invalid_payload(action_type, "route needs a shipmentId"));
        }

        Ok(Request {
            method: route.method,
            path,
            body: action.body()?,
            credentials: route.credentials,
        })
    }
}

/// Percent-encode a single path segment (RFC 3986 unreserved set kept).
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(char::from(byte))
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
