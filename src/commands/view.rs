//! `view`: evaluate one view and render it as JSON.

use chrono::NaiveDate;

use super::CommandError;
use crate::config::{DEFAULT_DAILY_LOAD_WINDOW_DAYS, DEFAULT_UPCOMING_WINDOW_DAYS};
use crate::core_state::{AccessSource, CoreState};
use crate::engine::ViewRequest;
use crate::models::enums::{CrossTabAxis, ViewName};

/// Optional view arguments as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ViewArgs {
    pub as_of: Option<NaiveDate>,
    pub window_days: Option<u32>,
    pub axis: Option<CrossTabAxis>,
    pub term: Option<String>,
}

/// Turn a view name plus arguments into a request. Arguments a view does
/// not take are ignored; `crosstab` requires an axis.
pub fn build_request(
    name: ViewName,
    args: &ViewArgs,
    today: NaiveDate,
) -> Result<ViewRequest, CommandError> {
    let as_of = args.as_of.unwrap_or(today);
    let request = match name {
        ViewName::Summary => ViewRequest::Summary,
        ViewName::Patients => ViewRequest::Patients,
        ViewName::Appointments => ViewRequest::Appointments,
        ViewName::History => ViewRequest::History,
        ViewName::AgeHistogram => ViewRequest::AgeHistogram,
        ViewName::Upcoming => ViewRequest::Upcoming {
            as_of,
            window_days: args.window_days.unwrap_or(DEFAULT_UPCOMING_WINDOW_DAYS),
        },
        ViewName::DailyLoad => ViewRequest::DailyLoad {
            as_of,
            window_days: args.window_days.unwrap_or(DEFAULT_DAILY_LOAD_WINDOW_DAYS),
        },
        ViewName::Conditions => ViewRequest::Conditions,
        ViewName::CrossTab => {
            let axis = args.axis.ok_or_else(|| {
                CommandError::InvalidArgument("crosstab needs --axis age_group|gender".into())
            })?;
            ViewRequest::CrossTab { axis }
        }
        ViewName::TopDoctors => ViewRequest::TopDoctors,
        ViewName::WeeklyTrend => ViewRequest::WeeklyTrend,
        ViewName::Heatmap => ViewRequest::Heatmap,
        ViewName::Search => ViewRequest::search(args.term.as_deref().unwrap_or("")),
    };
    Ok(request)
}

/// Evaluate `request` and return pretty-printed JSON.
pub fn view(core: &CoreState, request: &ViewRequest) -> Result<String, CommandError> {
    let result = core.view(request)?;
    core.log_access(AccessSource::Cli, "view", request.name().as_str());
    Ok(serde_json::to_string_pretty(result.as_ref())?)
}
