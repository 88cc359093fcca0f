use std::fmt;

/// REST collections exposed by the console backend
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Services of one environment: `services/{environment}`
    Services { environment: String },
    Environments,
    /// Environment choices for a select box: `environments/options`
    EnvironmentOptions,
    MockGroups,
    Groups,
}

impl Resource {
    pub fn services(environment: impl Into<String>) -> Self {
        Resource::Services {
            environment: environment.into(),
        }
    }

    /// Collection path relative to the backend base URL (no leading slash)
    pub fn path(&self) -> String {
        match self {
            Resource::Services { environment } => {
                format!("services/{}", urlencoding::encode(environment))
            }
            Resource::Environments => "environments".to_string(),
            Resource::EnvironmentOptions => "environments/options".to_string(),
            Resource::MockGroups => "mockgroups".to_string(),
            Resource::Groups => "groups".to_string(),
        }
    }

    /// Member path: `{collection}/{id}`
    pub fn member_path(&self, id: &str) -> String {
        format!("{}/{}", self.path(), urlencoding::encode(id))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Coarse server-side filter sent as query parameters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    params: Vec<(String, String)>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Segment value meaning "no restriction" in stats paths
pub const ALL: &str = "all";

/// Request-log query: path-segment filters plus datatable paging parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsQuery {
    pub groups: String,
    pub environment: String,
    pub min_date: String,
    pub max_date: String,
    pub code: String,
    pub search: String,
    pub display_start: usize,
    pub display_length: usize,
}

impl StatsQuery {
    /// `stats/{groups}/{environment}/{mindate}/{maxdate}/{code}/listDatatable`
    pub fn path(&self) -> String {
        let segments = [
            &self.groups,
            &self.environment,
            &self.min_date,
            &self.max_date,
            &self.code,
        ];
        let encoded: Vec<String> = segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect();
        format!("stats/{}/listDatatable", encoded.join("/"))
    }
}

impl Default for StatsQuery {
    fn default() -> Self {
        Self {
            groups: ALL.to_string(),
            environment: ALL.to_string(),
            min_date: ALL.to_string(),
            max_date: ALL.to_string(),
            code: ALL.to_string(),
            search: String::new(),
            display_start: 0,
            display_length: 10_000,
        }
    }
}
