use serde::{Deserialize, Serialize};

use crate::domain::resource::{
    Column, FilterField, FormField, InputKind, Resource, STATUS_OPTIONS, Section, cell,
};
use crate::domain::types::EntityId;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BlogCategory {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub posts_count: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Resource for BlogCategory {
    const SLUG: &'static str = "blog-categories";
    const ENDPOINT: &'static str = "/blog-categories";
    const TITLE: &'static str = "Blog categories";
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
                key: "slug",
                label: "Slug",
            },
            Column {
                key: "posts_count",
                label: "Posts",
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
            cell(&self.slug),
            cell(&self.posts_count),
            cell(&self.status),
        ]
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
            FormField::optional("slug", "Slug", InputKind::Text),
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
