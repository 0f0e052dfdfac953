use utoipa::OpenApi;

use super::api::{elements, error, passes, tracker};

#[derive(OpenApi)]
#[openapi(
    paths(
        passes::list_passes,
        elements::list_elements,
        tracker::run,
        tracker::stop,
        tracker::status,
        tracker::status_sample,
    ),
    components(
        schemas(
            passes::PassesResponse,
            passes::PassRecord,
            elements::ElementsResponse,
            error::ErrorResponse,
            crate::horizon::Pass,
            crate::horizon::LookAngleSample,
            crate::predict::ElementSummary,
            crate::predict::sun::SunPosition,
            crate::tracker::RunCommand,
            crate::tracker::TrackerMode,
            crate::tracker::TrackerStatus,
        )
    ),
    info(
        title = "Passcast API",
        description = "Satellite pass prediction and live tracking",
        version = "0.1.0"
    ),
    tags(
        (name = "passes", description = "Pass schedules over the configured horizon"),
        (name = "elements", description = "Orbital element summaries"),
        (name = "tracker", description = "Live tracking control")
    )
)]
pub struct ApiDoc;
