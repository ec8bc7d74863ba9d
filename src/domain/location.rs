//! Administrative geography: divisions, districts and the branches located in them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::resource::{
    Column, FilterField, FormField, InputKind, Resource, STATUS_OPTIONS, Section, cell,
};
use crate::domain::types::EntityId;

/// Minimal reference to a related entity embedded in list payloads.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EntityRef {
    pub id: EntityId,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Division {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub bn_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Resource for Division {
    const SLUG: &'static str = "divisions";
    const ENDPOINT: &'static str = "/divisions";
    const TITLE: &'static str = "Divisions";
    const SECTION: Section = Section::Dashboard;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn columns() -> &'static [Column] {
        &[
            Column {
                key: "name",
                label: "Name",
            },
            Column {
                key: "bn_name",
                label: "Local name",
            },
            Column {
                key: "status",
                label: "Status",
            },
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone(), cell(&self.bn_name), cell(&self.status)]
    }

    fn filters() -> &'static [FilterField] {
        const FILTERS: &[FilterField] = &[
            FilterField::search(),
            FilterField::status(),
            FilterField::sort_order(),
        ];
        FILTERS
    }

    fn form_fields() -> &'static [FormField] {
        const FIELDS: &[FormField] = &[
            FormField::required("name", "Name", InputKind::Text),
            FormField::optional("bn_name", "Local name", InputKind::Text),
            FormField::required(
                "status",
                "Status",
                InputKind::Select {
                    options: STATUS_OPTIONS,
                },
            ),
        ];
        FIELDS
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct District {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub bn_name: Option<String>,
    #[serde(default)]
    pub division_id: Option<EntityId>,
    #[serde(default)]
    pub division: Option<EntityRef>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Resource for District {
    const SLUG: &'static str = "districts";
    const ENDPOINT: &'static str = "/districts";
    const TITLE: &'static str = "Districts";
    const SECTION: Section = Section::Dashboard;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn columns() -> &'static [Column] {
        &[
            Column {
                key: "name",
                label: "Name",
            },
            Column {
                key: "division",
                label: "Division",
            },
            Column {
                key: "status",
                label: "Status",
            },
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            cell(&self.division.as_ref().map(|d| d.name.clone())),
            cell(&self.status),
        ]
    }

    fn filters() -> &'static [FilterField] {
        const FILTERS: &[FilterField] = &[
            FilterField::search(),
            FilterField::remote("division_id", "Division", "/divisions"),
            FilterField::status(),
            FilterField::sort_order(),
        ];
        FILTERS
    }

    fn form_fields() -> &'static [FormField] {
        const FIELDS: &[FormField] = &[
            FormField::required("name", "Name", InputKind::Text),
            FormField::optional("bn_name", "Local name", InputKind::Text),
            FormField::required(
                "division_id",
                "Division",
                InputKind::RemoteSelect {
                    endpoint: "/divisions",
                },
            ),
            FormField::required(
                "status",
                "Status",
                InputKind::Select {
                    options: STATUS_OPTIONS,
                },
            ),
        ];
        FIELDS
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Branch {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub district_id: Option<EntityId>,
    #[serde(default)]
    pub district: Option<EntityRef>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Resource for Branch {
    const SLUG: &'static str = "branches";
    const ENDPOINT: &'static str = "/branches";
    const TITLE: &'static str = "Branches";
    const SECTION: Section = Section::Dashboard;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn columns() -> &'static [Column] {
        &[
            Column {
                key: "name",
                label: "Name",
            },
            Column {
                key: "district",
                label: "District",
            },
            Column {
                key: "phone",
                label: "Phone",
            },
            Column {
                key: "status",
                label: "Status",
            },
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            cell(&self.district.as_ref().map(|d| d.name.clone())),
            cell(&self.phone),
            cell(&self.status),
        ]
    }

    fn filters() -> &'static [FilterField] {
        const FILTERS: &[FilterField] = &[
            FilterField::search(),
            FilterField::remote("district_id", "District", "/districts"),
            FilterField::status(),
            FilterField::sort_order(),
        ];
        FILTERS
    }

    fn form_fields() -> &'static [FormField] {
        const FIELDS: &[FormField] = &[
            FormField::required("name", "Name", InputKind::Text),
            FormField::optional("address", "Address", InputKind::Textarea),
            FormField::optional("phone", "Phone", InputKind::Text),
            FormField::required(
                "district_id",
                "District",
                InputKind::RemoteSelect {
                    endpoint: "/districts",
                },
            ),
            FormField::required(
                "status",
                "Status",
                InputKind::Select {
                    options: STATUS_OPTIONS,
                },
            ),
        ];
        FIELDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn district_deserializes_with_embedded_division() {
        let district: District = serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "Dhaka",
            "division_id": 1,
            "division": {"id": 1, "name": "Dhaka Division"},
            "status": "active"
        }))
        .unwrap();

        assert_eq!(district.id.get(), 3);
        assert_eq!(district.cells(), vec!["Dhaka", "Dhaka Division", "active"]);
    }

    #[test]
    fn missing_optional_values_render_placeholder() {
        let branch: Branch = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Mirpur"
        }))
        .unwrap();

        assert_eq!(branch.cells(), vec!["Mirpur", "-", "-", "-"]);
        assert_eq!(Branch::base_path(), "/dashboard/branches");
        assert!(Branch::recognizes("district_id"));
        assert!(!Branch::recognizes("division_id"));
    }
}
