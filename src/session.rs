use std::collections::HashSet;

/// Authenticated actor context, injected by the host application after login.
/// This crate never reads it from ambient state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    granted: HashSet<String>,
    kind: Option<i64>,
}

impl Session {
    pub fn new<I, S>(granted: I, kind: Option<i64>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            granted: granted.into_iter().map(Into::into).collect(),
            kind,
        }
    }

    pub fn kind(&self) -> Option<i64> {
        self.kind
    }

    /// True iff every required code is granted and the kind constraints hold.
    /// An empty requirement passes vacuously, which is the explicit form of
    /// "no permission code means always visible".
    pub fn has_permission(&self, check: &PermissionCheck<'_>) -> bool {
        if let Some(required) = check.required_kind
            && self.kind != Some(required)
        {
            return false;
        }
        if let Some(excluded) = check.exclude_kind
            && self.kind == Some(excluded)
        {
            return false;
        }
        check
            .required_permissions
            .iter()
            .all(|code| self.granted.contains(*code))
    }
}

#[derive(Debug, Clone, Default)]
pub struct PermissionCheck<'a> {
    pub required_permissions: &'a [&'a str],
    pub required_kind: Option<i64>,
    pub exclude_kind: Option<i64>,
}

impl<'a> PermissionCheck<'a> {
    pub fn codes(required_permissions: &'a [&'a str]) -> Self {
        Self {
            required_permissions,
            required_kind: None,
            exclude_kind: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Session {
        Session::new(["MOVIE_L", "MOVIE_D"], Some(1))
    }

    #[test]
    fn requires_every_code() {
        let session = admin();
        assert!(session.has_permission(&PermissionCheck::codes(&["MOVIE_L", "MOVIE_D"])));
        assert!(!session.has_permission(&PermissionCheck::codes(&["MOVIE_L", "MOVIE_C"])));
    }

    #[test]
    fn empty_requirement_passes() {
        assert!(admin().has_permission(&PermissionCheck::codes(&[])));
        assert!(Session::default().has_permission(&PermissionCheck::codes(&[])));
    }

    #[test]
    fn kind_constraints() {
        let session = admin();
        let mut check = PermissionCheck::codes(&["MOVIE_L"]);
        check.required_kind = Some(1);
        assert!(session.has_permission(&check));

        check.required_kind = Some(2);
        assert!(!session.has_permission(&check));

        check.required_kind = None;
        check.exclude_kind = Some(1);
        assert!(!session.has_permission(&check));
    }
}
