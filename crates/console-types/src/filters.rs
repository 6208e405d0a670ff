//! List filters and their query-string encoding.

use crate::models::Role;
use chrono::NaiveDate;

/// Filters for the paginated user listing.
#[derive(Debug, Clone, PartialEq)]
pub struct UserFilters {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
    pub role: Option<Role>,
}

impl Default for UserFilters {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            search: None,
            role: None,
        }
    }
}

impl UserFilters {
    /// Encode as query pairs, omitting unset optional filters.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        if let Some(role) = self.role {
            pairs.push(("role".to_string(), role.as_str().to_string()));
        }
        pairs
    }
}

/// Filters for the paginated voter listing.
#[derive(Debug, Clone, PartialEq)]
pub struct VoterFilters {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
    pub region_id: Option<i64>,
    pub district_id: Option<i64>,
    pub vote_center_id: Option<i64>,
    /// Lower bound on registration date, inclusive.
    pub from: Option<NaiveDate>,
    /// Upper bound on registration date, inclusive.
    pub to: Option<NaiveDate>,
}

impl Default for VoterFilters {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            search: None,
            region_id: None,
            district_id: None,
            vote_center_id: None,
            from: None,
            to: None,
        }
    }
}

impl VoterFilters {
    /// Encode as query pairs, omitting unset optional filters.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        if let Some(region_id) = self.region_id {
            pairs.push(("regionId".to_string(), region_id.to_string()));
        }
        if let Some(district_id) = self.district_id {
            pairs.push(("districtId".to_string(), district_id.to_string()));
        }
        if let Some(vote_center_id) = self.vote_center_id {
            pairs.push(("voteCenterId".to_string(), vote_center_id.to_string()));
        }
        if let Some(from) = self.from {
            pairs.push(("from".to_string(), from.to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to".to_string(), to.to_string()));
        }
        pairs
    }
}
