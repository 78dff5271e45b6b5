use serde::Serialize;

// Body de PUT /admin/updatestatus/{driverId}
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DriverStatusPayload {
    pub is_active: bool,
}
