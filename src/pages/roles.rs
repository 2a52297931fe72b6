use std::collections::BTreeMap;

use serde_json::{json, Value};
use tracing::info;

use super::{MutationError, Page, PageState, Resource, ResourcePage};
use crate::api::{ApiClient, ApiRequest};
use crate::forms::RoleForm;
use crate::models::{Permission, Role};
use crate::output::Record;

impl Resource for Role {
    type Form = RoleForm;

    const ENDPOINT: &'static str = "roles.php";
    const LIST_KEYS: &'static [&'static str] = &["roles"];
    const NOUN: &'static str = "role";

    fn id(&self) -> i64 {
        self.id
    }

    fn status_toggle(&self) -> Value {
        json!({ "is_active": !self.is_active })
    }

    fn sort(rows: &mut [Self]) {
        rows.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    }
}

impl Record for Role {
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "Name",
        "Active",
        "Permissions",
        "Description",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            if self.is_active { "yes" } else { "no" }.to_string(),
            self.permissions.len().to_string(),
            self.description.clone(),
        ]
    }
}

impl Record for Permission {
    const COLUMNS: &'static [&'static str] = &["Module", "Permission", "Description"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.module.clone(),
            self.slug.clone(),
            self.description.clone(),
        ]
    }
}

/// Permission catalogue keyed by module, modules and slugs sorted.
pub fn group_by_module(permissions: &[Permission]) -> BTreeMap<String, Vec<&Permission>> {
    let mut out: BTreeMap<String, Vec<&Permission>> = BTreeMap::new();
    for p in permissions {
        let module = if p.module.trim().is_empty() {
            "general".to_string()
        } else {
            p.module.trim().to_lowercase()
        };
        out.entry(module).or_default().push(p);
    }
    for list in out.values_mut() {
        list.sort_by(|a, b| a.slug.cmp(&b.slug));
    }
    out
}

/// Slugs in `requested` that the catalogue does not know.
pub fn unknown_permissions<'a>(catalogue: &[Permission], requested: &'a [String]) -> Vec<&'a str> {
    requested
        .iter()
        .filter(|r| !catalogue.iter().any(|p| &p.slug == *r))
        .map(String::as_str)
        .collect()
}

pub struct RolesPage {
    pub roles: ResourcePage<Role>,
    pub permissions: Page<Vec<Permission>>,
}

impl RolesPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            roles: ResourcePage::new(client),
            permissions: Page::new("permissions"),
        }
    }

    /// Loads roles and the permission catalogue concurrently.
    pub async fn refresh(&self) -> (PageState<Vec<Role>>, PageState<Vec<Permission>>) {
        tokio::join!(self.roles.refresh(), self.refresh_permissions())
    }

    pub async fn refresh_permissions(&self) -> PageState<Vec<Permission>> {
        let client = self.roles.client().clone();
        self.permissions
            .load(async move {
                client
                    .fetch(ApiRequest::get("permissions.php"), &["permissions"])
                    .await
            })
            .await
    }

    /// Replaces a role's permission set, then refetches the roles.
    pub async fn assign_permissions(
        &self,
        role_id: i64,
        permissions: &[String],
    ) -> Result<Value, MutationError> {
        let request = ApiRequest::put(
            Role::ENDPOINT,
            json!({ "role_id": role_id, "permissions": permissions }),
        )
        .action(Some("permissions"));
        let resp = self.roles.client().send(request).await?;
        info!(role_id, count = permissions.len(), "permissions assigned");
        self.roles.refresh().await;
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perm(slug: &str, module: &str) -> Permission {
        Permission {
            slug: slug.to_string(),
            module: module.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn catalogue_groups_by_module() {
        let catalogue = vec![
            perm("students.edit", "Students"),
            perm("students.view", "students"),
            perm("settings.edit", ""),
        ];
        let grouped = group_by_module(&catalogue);
        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["general", "students"]);
        assert_eq!(grouped["students"][0].slug, "students.edit");
    }

    #[test]
    fn unknown_slugs_are_reported() {
        let catalogue = vec![perm("students.view", "students")];
        let requested = vec!["students.view".to_string(), "fees.delete".to_string()];
        assert_eq!(unknown_permissions(&catalogue, &requested), vec!["fees.delete"]);
    }
}
