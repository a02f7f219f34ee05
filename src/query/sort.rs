use super::error::QueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("desc") { SortDirection::Desc } else { SortDirection::Asc }
    }
}

/// Maps a caller-facing sort field name to the column it sorts on.
#[derive(Debug, Clone, Copy)]
pub struct SortField {
    pub name: &'static str,
    pub column: &'static str,
}

/// A resolved ORDER BY target.
#[derive(Debug, Clone)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self { column: column.into(), direction }
    }

    /// Resolve the caller-supplied sort pair against a field whitelist.
    ///
    /// The pair is all-or-nothing: a caller-specified sort applies only when
    /// BOTH `sort_by` and `sort_type` are present, otherwise the default is
    /// used. A `sort_by` outside the whitelist is rejected.
    pub fn from_params(
        sort_by: Option<&str>,
        sort_type: Option<&str>,
        allowed: &[SortField],
        default: SortSpec,
    ) -> Result<SortSpec, QueryError> {
        match (sort_by, sort_type) {
            (Some(by), Some(ty)) => {
                let field = allowed
                    .iter()
                    .find(|f| f.name == by)
                    .ok_or_else(|| QueryError::UnknownSortField(by.to_string()))?;
                Ok(SortSpec::new(field.column, SortDirection::parse(ty)))
            }
            _ => Ok(default),
        }
    }

    pub fn to_sql(&self) -> String {
        format!("{} {}", self.column, self.direction.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[SortField] = &[
        SortField { name: "createdAt", column: "v.created_at" },
        SortField { name: "views", column: "v.views" },
    ];

    fn default_sort() -> SortSpec {
        SortSpec::new("v.created_at", SortDirection::Desc)
    }

    #[test]
    fn applies_sort_only_when_both_params_present() {
        let spec =
            SortSpec::from_params(Some("views"), Some("asc"), FIELDS, default_sort()).unwrap();
        assert_eq!(spec.column, "v.views");
        assert_eq!(spec.direction, SortDirection::Asc);
    }

    #[test]
    fn falls_back_to_default_when_pair_is_incomplete() {
        // sort_by without sort_type
        let spec = SortSpec::from_params(Some("views"), None, FIELDS, default_sort()).unwrap();
        assert_eq!(spec.column, "v.created_at");
        assert_eq!(spec.direction, SortDirection::Desc);

        // sort_type without sort_by
        let spec = SortSpec::from_params(None, Some("asc"), FIELDS, default_sort()).unwrap();
        assert_eq!(spec.column, "v.created_at");
        assert_eq!(spec.direction, SortDirection::Desc);
    }

    #[test]
    fn rejects_unknown_sort_field() {
        let err = SortSpec::from_params(Some("password"), Some("asc"), FIELDS, default_sort());
        assert!(matches!(err, Err(QueryError::UnknownSortField(f)) if f == "password"));
    }

    #[test]
    fn unknown_direction_defaults_to_asc() {
        let spec =
            SortSpec::from_params(Some("views"), Some("sideways"), FIELDS, default_sort()).unwrap();
        assert_eq!(spec.direction, SortDirection::Asc);
    }
}
