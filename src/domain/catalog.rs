//! Course catalogue entities: categories, courses, batches, enrollments and coupons.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::location::EntityRef;
use crate::domain::resource::{
    Column, FilterField, FormField, InputKind, Resource, RowAction, STATUS_OPTIONS, Section,
    StaticOption, cell,
};
use crate::domain::types::{EntityId, optional_date};

pub const COURSE_TYPE_OPTIONS: &[StaticOption] = &[
    StaticOption {
        value: "online",
        label: "Online",
    },
    StaticOption {
        value: "offline",
        label: "Offline",
    },
    StaticOption {
        value: "recorded",
        label: "Recorded",
    },
];

pub const DISCOUNT_TYPE_OPTIONS: &[StaticOption] = &[
    StaticOption {
        value: "percentage",
        label: "Percentage",
    },
    StaticOption {
        value: "fixed",
        label: "Fixed amount",
    },
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub courses_count: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Resource for Category {
    const SLUG: &'static str = "categories";
    const ENDPOINT: &'static str = "/categories";
    const TITLE: &'static str = "Categories";
    const SECTION: Section = Section::Lms;

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
                key: "courses_count",
                label: "Courses",
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
            cell(&self.courses_count),
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

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub course_type: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category_id: Option<EntityId>,
    #[serde(default)]
    pub category: Option<EntityRef>,
    #[serde(default)]
    pub branch_id: Option<EntityId>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

const COURSE_COLUMNS: &[Column] = &[
    Column {
        key: "title",
        label: "Title",
    },
    Column {
        key: "category",
        label: "Category",
    },
    Column {
        key: "course_type",
        label: "Type",
    },
    Column {
        key: "price",
        label: "Price",
    },
    Column {
        key: "status",
        label: "Status",
    },
];

impl Course {
    fn course_cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            cell(&self.category.as_ref().map(|c| c.name.clone())),
            cell(&self.course_type),
            cell(&self.price.map(|price| format!("{price:.2}"))),
            cell(&self.status),
        ]
    }
}

impl Resource for Course {
    const SLUG: &'static str = "courses";
    const ENDPOINT: &'static str = "/courses";
    const TITLE: &'static str = "Courses";
    const SECTION: Section = Section::Lms;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> String {
        self.title.clone()
    }

    fn columns() -> &'static [Column] {
        COURSE_COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        self.course_cells()
    }

    fn filters() -> &'static [FilterField] {
        const FILTERS: &[FilterField] = &[
            FilterField::search(),
            FilterField::remote("category_id", "Category", "/categories"),
            FilterField::remote("branch_id", "Branch", "/branches"),
            FilterField {
                key: "course_type",
                label: "Type",
                kind: InputKind::Select {
                    options: COURSE_TYPE_OPTIONS,
                },
            },
            FilterField::status(),
            FilterField::sort_order(),
        ];
        FILTERS
    }

    fn form_fields() -> &'static [FormField] {
        const FIELDS: &[FormField] = &[
            FormField::required("title", "Title", InputKind::Text),
            FormField::required(
                "category_id",
                "Category",
                InputKind::RemoteSelect {
                    endpoint: "/categories",
                },
            ),
            FormField::optional(
                "branch_id",
                "Branch",
                InputKind::RemoteSelect {
                    endpoint: "/branches",
                },
            ),
            FormField::required(
                "course_type",
                "Type",
                InputKind::Select {
                    options: COURSE_TYPE_OPTIONS,
                },
            ),
            FormField::required("price", "Price", InputKind::Number),
            FormField::optional("description", "Description", InputKind::Textarea),
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

/// Course as exposed by the unauthenticated catalogue endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PublicCourse(pub Course);

impl Resource for PublicCourse {
    const SLUG: &'static str = "courses";
    const ENDPOINT: &'static str = "/public/courses";
    const TITLE: &'static str = "Courses";
    const SECTION: Section = Section::Lms;
    const PUBLIC: bool = true;

    fn id(&self) -> EntityId {
        self.0.id
    }

    fn label(&self) -> String {
        self.0.title.clone()
    }

    fn columns() -> &'static [Column] {
        COURSE_COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        self.0.course_cells()
    }

    fn filters() -> &'static [FilterField] {
        const FILTERS: &[FilterField] = &[
            FilterField::search(),
            FilterField::remote("category_id", "Category", "/public/categories"),
            FilterField {
                key: "course_type",
                label: "Type",
                kind: InputKind::Select {
                    options: COURSE_TYPE_OPTIONS,
                },
            },
        ];
        FILTERS
    }

    fn form_fields() -> &'static [FormField] {
        &[]
    }

    fn row_actions() -> &'static [RowAction] {
        &[RowAction::View]
    }

    fn base_path() -> String {
        "/courses".to_string()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Group {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub course_id: Option<EntityId>,
    #[serde(default)]
    pub course: Option<EntityRef>,
    #[serde(default)]
    pub teacher_id: Option<EntityId>,
    #[serde(default, with = "optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Resource for Group {
    const SLUG: &'static str = "groups";
    const ENDPOINT: &'static str = "/groups";
    const TITLE: &'static str = "Groups";
    const SECTION: Section = Section::Lms;

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
                key: "course",
                label: "Course",
            },
            Column {
                key: "start_date",
                label: "Starts",
            },
            Column {
                key: "capacity",
                label: "Capacity",
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
            cell(&self.course.as_ref().map(|c| c.name.clone())),
            cell(&self.start_date),
            cell(&self.capacity),
            cell(&self.status),
        ]
    }

    fn filters() -> &'static [FilterField] {
        const FILTERS: &[FilterField] = &[
            FilterField::search(),
            FilterField::remote("course_id", "Course", "/courses"),
            FilterField::status(),
            FilterField::sort_order(),
        ];
        FILTERS
    }

    fn form_fields() -> &'static [FormField] {
        const FIELDS: &[FormField] = &[
            FormField::required("name", "Name", InputKind::Text),
            FormField::required(
                "course_id",
                "Course",
                InputKind::RemoteSelect {
                    endpoint: "/courses",
                },
            ),
            FormField::optional(
                "teacher_id",
                "Teacher",
                InputKind::RemoteSelect {
                    endpoint: "/teachers",
                },
            ),
            FormField::optional("start_date", "Start date", InputKind::Date),
            FormField::optional("capacity", "Capacity", InputKind::Number),
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
pub struct Enrollment {
    pub id: EntityId,
    #[serde(default)]
    pub student: Option<EntityRef>,
    #[serde(default)]
    pub course: Option<EntityRef>,
    #[serde(default)]
    pub group: Option<EntityRef>,
    #[serde(default)]
    pub paid_amount: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub enrolled_at: Option<DateTime<Utc>>,
}

impl Resource for Enrollment {
    const SLUG: &'static str = "enrollments";
    const ENDPOINT: &'static str = "/enrollments";
    const TITLE: &'static str = "Enrollments";
    const SECTION: Section = Section::Lms;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> String {
        format!("Enrollment #{}", self.id)
    }

    fn columns() -> &'static [Column] {
        &[
            Column {
                key: "student",
                label: "Student",
            },
            Column {
                key: "course",
                label: "Course",
            },
            Column {
                key: "group",
                label: "Group",
            },
            Column {
                key: "paid_amount",
                label: "Paid",
            },
            Column {
                key: "status",
                label: "Status",
            },
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            cell(&self.student.as_ref().map(|s| s.name.clone())),
            cell(&self.course.as_ref().map(|c| c.name.clone())),
            cell(&self.group.as_ref().map(|g| g.name.clone())),
            cell(&self.paid_amount.map(|amount| format!("{amount:.2}"))),
            cell(&self.status),
        ]
    }

    fn filters() -> &'static [FilterField] {
        const FILTERS: &[FilterField] = &[
            FilterField::search(),
            FilterField::remote("course_id", "Course", "/courses"),
            FilterField::remote("group_id", "Group", "/groups"),
            FilterField::status(),
            FilterField::sort_order(),
        ];
        FILTERS
    }

    fn form_fields() -> &'static [FormField] {
        const FIELDS: &[FormField] = &[
            FormField::required(
                "student_id",
                "Student",
                InputKind::RemoteSelect {
                    endpoint: "/students",
                },
            ),
            FormField::required(
                "course_id",
                "Course",
                InputKind::RemoteSelect {
                    endpoint: "/courses",
                },
            ),
            FormField::optional(
                "group_id",
                "Group",
                InputKind::RemoteSelect { endpoint: "/groups" },
            ),
            FormField::optional("paid_amount", "Paid amount", InputKind::Number),
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
pub struct Coupon {
    pub id: EntityId,
    pub code: String,
    #[serde(default)]
    pub discount_type: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default, with = "optional_date")]
    pub expires_at: Option<NaiveDate>,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub course_ids: Vec<EntityId>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Resource for Coupon {
    const SLUG: &'static str = "coupons";
    const ENDPOINT: &'static str = "/coupons";
    const TITLE: &'static str = "Coupons";
    const SECTION: Section = Section::Dashboard;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> String {
        self.code.clone()
    }

    fn columns() -> &'static [Column] {
        &[
            Column {
                key: "code",
                label: "Code",
            },
            Column {
                key: "discount_type",
                label: "Discount",
            },
            Column {
                key: "amount",
                label: "Amount",
            },
            Column {
                key: "expires_at",
                label: "Expires",
            },
            Column {
                key: "status",
                label: "Status",
            },
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            cell(&self.discount_type),
            cell(&self.amount.map(|amount| format!("{amount:.2}"))),
            cell(&self.expires_at),
            cell(&self.status),
        ]
    }

    fn filters() -> &'static [FilterField] {
        const FILTERS: &[FilterField] = &[
            FilterField::search(),
            FilterField {
                key: "discount_type",
                label: "Discount",
                kind: InputKind::Select {
                    options: DISCOUNT_TYPE_OPTIONS,
                },
            },
            FilterField {
                key: "course_id",
                label: "Courses",
                kind: InputKind::RemoteMultiSelect {
                    endpoint: "/courses",
                },
            },
            FilterField::status(),
            FilterField::sort_order(),
        ];
        FILTERS
    }

    fn form_fields() -> &'static [FormField] {
        const FIELDS: &[FormField] = &[
            FormField::required("code", "Code", InputKind::Text),
            FormField::required(
                "discount_type",
                "Discount type",
                InputKind::Select {
                    options: DISCOUNT_TYPE_OPTIONS,
                },
            ),
            FormField::required("amount", "Amount", InputKind::Number),
            FormField::optional("expires_at", "Expires at", InputKind::Date),
            FormField::optional("usage_limit", "Usage limit", InputKind::Number),
            FormField::optional(
                "course_ids",
                "Courses",
                InputKind::RemoteMultiSelect {
                    endpoint: "/courses",
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
