//! # Role Assignment
//!
//! Turns the flat account list into explicitly tagged roles, validated once
//! at startup:
//!
//! ```text
//! slot 0                          → Owner (pre-registered first airline)
//! airline_offset .. +airlines     → Airline candidates
//! passenger_offset .. +passengers → Passengers
//! flight_operator (optional)      → FlightOperator (owner when unset)
//! ```
//!
//! Owner, Airline and Passenger slots are exclusive. FlightOperator is a
//! capability held by the owner or one airline candidate.

use super::errors::RoleLayoutError;
use fs_01_contract_gateway::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Slot of the owner account.
pub const OWNER_SLOT: usize = 0;

/// Account role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Contract owner and first airline.
    Owner,
    /// Airline candidate.
    Airline,
    /// Passenger.
    Passenger,
    /// Sender of `registerFlight`.
    FlightOperator,
}

impl Role {
    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Airline => "airline",
            Role::Passenger => "passenger",
            Role::FlightOperator => "flight-operator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One account tagged with a role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoleAssignment {
    /// Role.
    pub role: Role,
    /// Index in the account list.
    pub slot: usize,
    /// Account.
    pub account: Address,
}

/// Slot offsets for each role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleLayout {
    /// First airline candidate slot.
    pub airline_offset: usize,
    /// First passenger slot.
    pub passenger_offset: usize,
    /// Dedicated flight operator slot; `None` means the owner.
    pub flight_operator: Option<usize>,
}

impl Default for RoleLayout {
    fn default() -> Self {
        Self {
            airline_offset: 1,
            passenger_offset: 11,
            flight_operator: None,
        }
    }
}

impl RoleLayout {
    /// Assign roles for `airline_count` candidates and `passenger_count` passengers.
    pub fn assign(
        &self,
        accounts: &[Address],
        airline_count: usize,
        passenger_count: usize,
    ) -> Result<RoleAssignments, RoleLayoutError> {
        if accounts.is_empty() {
            return Err(RoleLayoutError::NotEnoughAccounts {
                needed: 1,
                available: 0,
            });
        }
        let available = accounts.len();
        let mut claimed: Vec<Option<Role>> = vec![None; available];
        let mut assignments = Vec::with_capacity(1 + airline_count + passenger_count + 1);

        let mut claim = |role: Role, slot: usize| -> Result<RoleAssignment, RoleLayoutError> {
            let account = *accounts.get(slot).ok_or(RoleLayoutError::OutOfRange {
                role: role.name(),
                slot,
                available,
            })?;
            if let Some(first) = claimed[slot] {
                return Err(RoleLayoutError::Overlap {
                    slot,
                    first: first.name(),
                    second: role.name(),
                });
            }
            claimed[slot] = Some(role);
            Ok(RoleAssignment {
                role,
                slot,
                account,
            })
        };

        assignments.push(claim(Role::Owner, OWNER_SLOT)?);
        for slot in self.airline_offset..self.airline_offset + airline_count {
            assignments.push(claim(Role::Airline, slot)?);
        }
        for slot in self.passenger_offset..self.passenger_offset + passenger_count {
            assignments.push(claim(Role::Passenger, slot)?);
        }

        let operator_slot = self.flight_operator.unwrap_or(OWNER_SLOT);
        let operator = *accounts.get(operator_slot).ok_or(RoleLayoutError::OutOfRange {
            role: Role::FlightOperator.name(),
            slot: operator_slot,
            available,
        })?;
        match claimed[operator_slot] {
            Some(Role::Owner) | Some(Role::Airline) => {}
            _ => {
                return Err(RoleLayoutError::OperatorNotAirline {
                    slot: operator_slot,
                })
            }
        }
        assignments.push(RoleAssignment {
            role: Role::FlightOperator,
            slot: operator_slot,
            account: operator,
        });

        Ok(RoleAssignments { assignments })
    }
}

/// Validated role assignments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleAssignments {
    assignments: Vec<RoleAssignment>,
}

impl RoleAssignments {
    /// All assignments in slot-claim order.
    pub fn all(&self) -> &[RoleAssignment] {
        &self.assignments
    }

    fn of(&self, role: Role) -> impl Iterator<Item = &RoleAssignment> {
        self.assignments.iter().filter(move |a| a.role == role)
    }

    /// Owner account.
    pub fn owner(&self) -> Address {
        // `assign` always claims the owner first.
        self.assignments[0].account
    }

    /// Airline candidate accounts, in slot order.
    pub fn airlines(&self) -> Vec<Address> {
        self.of(Role::Airline).map(|a| a.account).collect()
    }

    /// Passenger accounts, in slot order.
    pub fn passengers(&self) -> Vec<Address> {
        self.of(Role::Passenger).map(|a| a.account).collect()
    }

    /// Flight operator assignment.
    pub fn flight_operator(&self) -> RoleAssignment {
        // `assign` always pushes the operator last.
        self.assignments[self.assignments.len() - 1]
    }

    /// Whether flights are registered by an airline candidate that the
    /// airline pool has to fund first.
    pub fn operator_is_candidate(&self) -> bool {
        self.flight_operator().slot != OWNER_SLOT
    }

    /// Position of the operator among the airline candidates.
    pub fn operator_candidate_index(&self) -> Option<usize> {
        let operator = self.flight_operator();
        self.of(Role::Airline).position(|a| a.slot == operator.slot)
    }
}
