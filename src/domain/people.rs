//! Students and teachers managed by the HR section.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::location::EntityRef;
use crate::domain::resource::{
    Column, FilterField, FormField, InputKind, Resource, STATUS_OPTIONS, Section, cell,
};
use crate::domain::types::{EntityId, optional_date};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub branch_id: Option<EntityId>,
    #[serde(default)]
    pub branch: Option<EntityRef>,
    #[serde(default, with = "optional_date")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Resource for Student {
    const SLUG: &'static str = "students";
    const ENDPOINT: &'static str = "/students";
    const TITLE: &'static str = "Students";
    const SECTION: Section = Section::Hr;

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
                key: "email",
                label: "Email",
            },
            Column {
                key: "phone",
                label: "Phone",
            },
            Column {
                key: "branch",
                label: "Branch",
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
            cell(&self.email),
            cell(&self.phone),
            cell(&self.branch.as_ref().map(|b| b.name.clone())),
            cell(&self.status),
        ]
    }

    fn filters() -> &'static [FilterField] {
        const FILTERS: &[FilterField] = &[
            FilterField::search(),
            FilterField::remote("branch_id", "Branch", "/branches"),
            FilterField::remote("course_id", "Course", "/courses"),
            FilterField::status(),
            FilterField::sort_order(),
        ];
        FILTERS
    }

    fn form_fields() -> &'static [FormField] {
        const FIELDS: &[FormField] = &[
            FormField::required("name", "Name", InputKind::Text),
            FormField::required("email", "Email", InputKind::Text),
            FormField::optional("phone", "Phone", InputKind::Text),
            FormField::optional(
                "branch_id",
                "Branch",
                InputKind::RemoteSelect {
                    endpoint: "/branches",
                },
            ),
            FormField::optional("date_of_birth", "Date of birth", InputKind::Date),
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
pub struct Teacher {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub branch: Option<EntityRef>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub status: Option<String>,
}

impl Resource for Teacher {
    const SLUG: &'static str = "teachers";
    const ENDPOINT: &'static str = "/teachers";
    const TITLE: &'static str = "Teachers";
    const SECTION: Section = Section::Hr;

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
                key: "designation",
                label: "Designation",
            },
            Column {
                key: "email",
                label: "Email",
            },
            Column {
                key: "is_featured",
                label: "Featured",
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
            cell(&self.designation),
            cell(&self.email),
            if self.is_featured { "Yes" } else { "No" }.to_string(),
            cell(&self.status),
        ]
    }

    fn filters() -> &'static [FilterField] {
        const FILTERS: &[FilterField] = &[
            FilterField::search(),
            FilterField::remote("branch_id", "Branch", "/branches"),
            FilterField::status(),
            FilterField::sort_order(),
        ];
        FILTERS
    }

    fn form_fields() -> &'static [FormField] {
        const FIELDS: &[FormField] = &[
            FormField::required("name", "Name", InputKind::Text),
            FormField::required("email", "Email", InputKind::Text),
            FormField::optional("phone", "Phone", InputKind::Text),
            FormField::optional("designation", "Designation", InputKind::Text),
            FormField::optional(
                "branch_id",
                "Branch",
                InputKind::RemoteSelect {
                    endpoint: "/branches",
                },
            ),
            FormField::optional("is_featured", "Featured", InputKind::Checkbox),
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
