// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queued shipment actions.
//!
//! Every mutation the client wants to perform against the shipment service is
//! an [`Action`]: a closed sum type whose variant is the action's type tag and
//! whose contents are that type's payload. Payloads are validated when they
//! are built from untyped JSON and again at enqueue time, so malformed data
//! never reaches the store.
//!
//! Serialized shape:
//!
//! ```text
//! {"type":"UPDATE_STATUS","payload":{"shipmentId":"s-1","status":"cleared"}}
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Free-form payload fields passed through to the remote service unchanged.
pub type Fields = Map<String, Value>;

/// Tag naming the kind of mutation an action performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    CreateShipment,
    UpdateStatus,
    AddDocument,
    AddExpense,
    PayLiquidation,
    UpdateArrivalDate,
    SetDeclaration,
    UpdateShipment,
}

impl ActionType {
    /// Every action type, in declaration order.
    pub const ALL: [ActionType; 8] = [
        ActionType::CreateShipment,
        ActionType::UpdateStatus,
        ActionType::AddDocument,
        ActionType::AddExpense,
        ActionType::PayLiquidation,
        ActionType::UpdateArrivalDate,
        ActionType::SetDeclaration,
        ActionType::UpdateShipment,
    ];

    /// Returns the tag used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::CreateShipment => "CREATE_SHIPMENT",
            ActionType::UpdateStatus => "UPDATE_STATUS",
            ActionType::AddDocument => "ADD_DOCUMENT",
            ActionType::AddExpense => "ADD_EXPENSE",
            ActionType::PayLiquidation => "PAY_LIQUIDATION",
            ActionType::UpdateArrivalDate => "UPDATE_ARRIVAL_DATE",
            ActionType::SetDeclaration => "SET_DECLARATION",
            ActionType::UpdateShipment => "UPDATE_SHIPMENT",
        }
    }

    /// Comma-separated list of every tag, for error hints.
    pub fn valid_list() -> String {
        Self::ALL
            .iter()
            .map(ActionType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = Error;

    /// Accepts the canonical tag as well as lower-case and kebab-case
    /// spellings (`create-shipment`).
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| Error::InvalidActionType(s.to_string()))
    }
}

/// Payload for [`Action::CreateShipment`]. Sent to the service as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShipment {
    pub tracking_number: String,
    #[serde(flatten)]
    pub fields: Fields,
}

impl NewShipment {
    pub fn new(tracking_number: impl Into<String>) -> Self {
        NewShipment {
            tracking_number: tracking_number.into(),
            fields: Fields::new(),
        }
    }

    /// Adds a pass-through field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Payload for [`Action::UpdateStatus`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub shipment_id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub fields: Fields,
}

/// Payload for [`Action::AddExpense`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub shipment_id: String,
    pub description: String,
    pub amount: f64,
    #[serde(flatten)]
    pub fields: Fields,
}

/// Payload for [`Action::UpdateArrivalDate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalDate {
    pub shipment_id: String,
    pub arrival_date: NaiveDate,
    #[serde(flatten)]
    pub fields: Fields,
}

/// Payload for actions that address one shipment and pass a set of fields
/// through (documents, liquidation payments, declarations, edits).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentFields {
    pub shipment_id: String,
    #[serde(flatten)]
    pub fields: Fields,
}

impl ShipmentFields {
    pub fn new(shipment_id: impl Into<String>, fields: Fields) -> Self {
        ShipmentFields {
            shipment_id: shipment_id.into(),
            fields,
        }
    }
}

/// A mutation to perform against the shipment service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    CreateShipment(NewShipment),
    UpdateStatus(StatusChange),
    AddDocument(ShipmentFields),
    AddExpense(Expense),
    PayLiquidation(ShipmentFields),
    UpdateArrivalDate(ArrivalDate),
    SetDeclaration(ShipmentFields),
    UpdateShipment(ShipmentFields),
}

impl Action {
    /// Creates an UpdateStatus action.
    pub fn update_status(shipment_id: impl Into<String>, status: impl Into<String>) -> Self {
        Action::UpdateStatus(StatusChange {
            shipment_id: shipment_id.into(),
            status: status.into(),
            notes: None,
            fields: Fields::new(),
        })
    }

    /// Creates an AddExpense action.
    pub fn add_expense(
        shipment_id: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
    ) -> Self {
        Action::AddExpense(Expense {
            shipment_id: shipment_id.into(),
            description: description.into(),
            amount,
            fields: Fields::new(),
        })
    }

    /// Creates an UpdateArrivalDate action.
    pub fn update_arrival_date(shipment_id: impl Into<String>, date: NaiveDate) -> Self {
        Action::UpdateArrivalDate(ArrivalDate {
            shipment_id: shipment_id.into(),
            arrival_date: date,
            fields: Fields::new(),
        })
    }

    /// Builds a typed action from a tag and an untyped JSON payload.
    ///
    /// Fails with [`Error::InvalidPayload`] if the payload does not match the
    /// shape required by `action_type` or does not pass validation.
    pub fn from_parts(action_type: ActionType, payload: Value) -> Result<Self> {
        let tagged = serde_json::json!({ "type": action_type, "payload": payload });
        let action: Action = serde_json::from_value(tagged)
            .map_err(|e| Error::invalid_payload(action_type, e.to_string()))?;
        action.validate()?;
        Ok(action)
    }

    /// Returns the type tag of this action.
    pub fn action_type(&self) -> ActionType {
        match self {
            Action::CreateShipment(_) => ActionType::CreateShipment,
            Action::UpdateStatus(_) => ActionType::UpdateStatus,
            Action::AddDocument(_) => ActionType::AddDocument,
            Action::AddExpense(_) => ActionType::AddExpense,
            Action::PayLiquidation(_) => ActionType::PayLiquidation,
            Action::UpdateArrivalDate(_) => ActionType::UpdateArrivalDate,
            Action::SetDeclaration(_) => ActionType::SetDeclaration,
            Action::UpdateShipment(_) => ActionType::UpdateShipment,
        }
    }

    /// Returns the shipment this action addresses.
    ///
    /// Returns `None` for shipment creation, which has no id yet.
    pub fn shipment_id(&self) -> Option<&str> {
        match self {
            Action::CreateShipment(_) => None,
            Action::UpdateStatus(p) => Some(&p.shipment_id),
            Action::AddExpense(p) => Some(&p.shipment_id),
            Action::UpdateArrivalDate(p) => Some(&p.shipment_id),
            Action::AddDocument(p)
            | Action::PayLiquidation(p)
            | Action::SetDeclaration(p)
            | Action::UpdateShipment(p) => Some(&p.shipment_id),
        }
    }

    /// Checks the payload invariants each action type requires.
    pub fn validate(&self) -> Result<()> {
        let ty = self.action_type();
        let reject = |reason: &str| Err(Error::invalid_payload(ty, reason));

        if let Some(id) = self.shipment_id() {
            if id.trim().is_empty() {
                return reject("shipmentId cannot be empty");
            }
        }

        match self {
            Action::CreateShipment(p) if p.tracking_number.trim().is_empty() => {
                reject("trackingNumber cannot be empty")
            }
            Action::UpdateStatus(p) if p.status.trim().is_empty() => {
                reject("status cannot be empty")
            }
            Action::AddExpense(p) if p.description.trim().is_empty() => {
                reject("description cannot be empty")
            }
            Action::AddExpense(p) if !p.amount.is_finite() || p.amount < 0.0 => {
                reject("amount must be a non-negative number")
            }
            Action::AddDocument(p)
            | Action::PayLiquidation(p)
            | Action::SetDeclaration(p)
            | Action::UpdateShipment(p)
                if p.fields.is_empty() =>
            {
                reject("payload must carry at least one field besides shipmentId")
            }
            _ => Ok(()),
        }
    }

    /// Returns the JSON request body for this action.
    ///
    /// The shipment id travels in the request path, so it is stripped from
    /// the body; every other payload field is sent unchanged.
    pub fn body(&self) -> Result<Value> {
        let mut body = match self {
            Action::CreateShipment(p) => serde_json::to_value(p)?,
            Action::UpdateStatus(p) => serde_json::to_value(p)?,
            Action::AddExpense(p) => serde_json::to_value(p)?,
            Action::UpdateArrivalDate(p) => serde_json::to_value(p)?,
            Action::AddDocument(p)
            | Action::PayLiquidation(p)
            | Action::SetDeclaration(p)
            | Action::UpdateShipment(p) => serde_json::to_value(p)?,
        };
        if let Value::Object(map) = &mut body {
            map.remove("shipmentId");
        }
        Ok(body)
    }
}

/// An action waiting in the outbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedAction {
    /// Unique id assigned at enqueue time.
    pub id: String,
    /// The mutation to deliver.
    pub action: Action,
    /// Creation stamp; the only ordering key.
    pub timestamp: DateTime<Utc>,
    /// Failed delivery attempts so far.
    pub retries: u32,
    /// Message from the most recent failed attempt.
    #[serde(default)]
    pub last_error: Option<String>,
}

impl QueuedAction {
    /// Returns the type tag of the queued action.
    pub fn action_type(&self) -> ActionType {
        self.action.action_type()
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
