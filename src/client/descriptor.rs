use reqwest::Method;

/// One backend endpoint: method, path template and the permission code that
/// gates the matching UI affordance. `None` means the affordance is ungated.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub method: Method,
    pub path: String,
    pub permission_code: Option<String>,
}

impl Endpoint {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            permission_code: None,
        }
    }

    pub fn with_permission(mut self, code: &str) -> Self {
        self.permission_code = Some(code.to_string());
        self
    }

    /// Substitutes `:id` in the path template.
    pub fn path_for_id(&self, id: &str) -> String {
        self.path.replace(":id", id)
    }
}

/// Endpoint table for one admin resource, the client-side mirror of the
/// backend's route table for that resource.
#[derive(Debug, Clone)]
pub struct ResourceApi {
    pub get_list: Endpoint,
    pub get_by_id: Option<Endpoint>,
    pub create: Option<Endpoint>,
    pub update: Option<Endpoint>,
    pub delete: Option<Endpoint>,
    pub update_ordering: Option<Endpoint>,
}

impl ResourceApi {
    pub fn new(get_list: Endpoint) -> Self {
        Self {
            get_list,
            get_by_id: None,
            create: None,
            update: None,
            delete: None,
            update_ordering: None,
        }
    }

    /// Conventional CRUD table for `/v1/<resource>` backends.
    pub fn crud(base: &str, permission_prefix: &str) -> Self {
        Self {
            get_list: Endpoint::new(Method::GET, base)
                .with_permission(&format!("{permission_prefix}_L")),
            get_by_id: Some(
                Endpoint::new(Method::GET, &format!("{base}/:id"))
                    .with_permission(&format!("{permission_prefix}_V")),
            ),
            create: Some(
                Endpoint::new(Method::POST, base)
                    .with_permission(&format!("{permission_prefix}_C")),
            ),
            update: Some(
                Endpoint::new(Method::PUT, &format!("{base}/:id"))
                    .with_permission(&format!("{permission_prefix}_U")),
            ),
            delete: Some(
                Endpoint::new(Method::DELETE, &format!("{base}/:id"))
                    .with_permission(&format!("{permission_prefix}_D")),
            ),
            update_ordering: None,
        }
    }

    pub fn with_ordering(mut self, endpoint: Endpoint) -> Self {
        self.update_ordering = Some(endpoint);
        self
    }
}
