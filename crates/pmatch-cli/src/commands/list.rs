use pmatch_core::db::Repository;
use pmatch_core::{Child, Enquiry, PotentialMatch};

use crate::commands::common::{close_repository, open_repository, print_matches, Context};
use crate::error::CliError;

/// Which matches `list` selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFilter {
    Recent(usize),
    Enquiry(String),
    Child(String),
}

impl ListFilter {
    pub fn from_args(enquiry: Option<String>, child: Option<String>, limit: usize) -> Self {
        match (enquiry, child) {
            (Some(enquiry), _) => Self::Enquiry(enquiry.trim().to_string()),
            (None, Some(child)) => Self::Child(child.trim().to_string()),
            (None, None) => Self::Recent(limit),
        }
    }
}

pub fn list_matches(filter: &ListFilter, ctx: &Context) -> Result<Vec<PotentialMatch>, CliError> {
    let repo = open_repository(ctx)?;
    let matches = match filter {
        ListFilter::Recent(limit) => repo.list(*limit, 0)?,
        ListFilter::Enquiry(id) => repo.find_by_enquiry(&Enquiry::new(id.as_str()))?,
        ListFilter::Child(id) => repo.find_by_child(&Child::new(id.as_str()))?,
    };
    close_repository(repo)?;
    Ok(matches)
}

pub fn run_list(filter: &ListFilter, as_json: bool, ctx: &Context) -> Result<(), CliError> {
    let matches = list_matches(filter, ctx)?;
    print_matches(&matches, as_json)
}
