use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ProjectId, UserId};

/// Room types offered by a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomType {
    TwoRoom,
    ThreeRoom,
}

impl RoomType {
    pub const fn label(self) -> &'static str {
        match self {
            RoomType::TwoRoom => "TWO_ROOM",
            RoomType::ThreeRoom => "THREE_ROOM",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "TWO_ROOM" => Some(RoomType::TwoRoom),
            "THREE_ROOM" => Some(RoomType::ThreeRoom),
            _ => None,
        }
    }
}

/// A housing project open for applications during a date window.
///
/// The manager link is `None` when the persisted manager id could not be
/// resolved at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub neighbourhood: String,
    unit_count: u32,
    pub room_type: RoomType,
    pub selling_price: f64,
    pub application_start: NaiveDate,
    pub application_end: NaiveDate,
    pub manager: Option<UserId>,
    pub officer_slots: u32,
    pub officers: Vec<UserId>,
    pub visible: bool,
}

impl Project {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ProjectId,
        name: String,
        unit_count: u32,
        neighbourhood: String,
        room_type: RoomType,
        selling_price: f64,
        application_start: NaiveDate,
        application_end: NaiveDate,
        manager: Option<UserId>,
        officer_slots: u32,
        officers: Vec<UserId>,
        visible: bool,
    ) -> Self {
        Self {
            id,
            name,
            neighbourhood,
            unit_count,
            room_type,
            selling_price,
            application_start,
            application_end,
            manager,
            officer_slots,
            officers,
            visible,
        }
    }

    pub fn unit_count(&self) -> u32 {
        self.unit_count
    }

    /// Consumes one unit for a booking. Returns false and leaves the count
    /// untouched when no units remain.
    pub fn take_unit(&mut self) -> bool {
        if self.unit_count == 0 {
            return false;
        }
        self.unit_count -= 1;
        true
    }

    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn add_officer(&mut self, officer: UserId) {
        if !self.officers.contains(&officer) {
            self.officers.push(officer);
        }
    }

    pub fn is_managed_by(&self, manager: &UserId) -> bool {
        self.manager.as_ref() == Some(manager)
    }
}
