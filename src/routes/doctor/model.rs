use serde::Serialize;

use crate::database::Profile;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfileResponse {
    pub doctor_info: Profile,
    pub own_profile: bool,
}
