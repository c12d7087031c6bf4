use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Closed set of catalog categories. The string values are the wire and
/// storage representation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(64))")]
pub enum Category {
    #[sea_orm(string_value = "Free Courses")]
    #[serde(rename = "Free Courses")]
    FreeCourses,
    #[sea_orm(string_value = "Scholarship Mentoring")]
    #[serde(rename = "Scholarship Mentoring")]
    ScholarshipMentoring,
    #[sea_orm(string_value = "TOEFL/IELTS")]
    #[serde(rename = "TOEFL/IELTS")]
    ToeflIelts,
    #[sea_orm(string_value = "Grammar")]
    #[serde(rename = "Grammar")]
    Grammar,
    #[sea_orm(string_value = "Convo")]
    #[serde(rename = "Convo")]
    Convo,
    #[sea_orm(string_value = "English for Specific Purpose")]
    #[serde(rename = "English for Specific Purpose")]
    EnglishForSpecificPurpose,
    #[sea_orm(string_value = "Scholarship Support Service")]
    #[serde(rename = "Scholarship Support Service")]
    ScholarshipSupportService,
    #[sea_orm(string_value = "Product Digital")]
    #[serde(rename = "Product Digital")]
    ProductDigital,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::FreeCourses,
        Category::ScholarshipMentoring,
        Category::ToeflIelts,
        Category::Grammar,
        Category::Convo,
        Category::EnglishForSpecificPurpose,
        Category::ScholarshipSupportService,
        Category::ProductDigital,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FreeCourses => "Free Courses",
            Category::ScholarshipMentoring => "Scholarship Mentoring",
            Category::ToeflIelts => "TOEFL/IELTS",
            Category::Grammar => "Grammar",
            Category::Convo => "Convo",
            Category::EnglishForSpecificPurpose => "English for Specific Purpose",
            Category::ScholarshipSupportService => "Scholarship Support Service",
            Category::ProductDigital => "Product Digital",
        }
    }

    /// Exact, case-sensitive lookup by wire value.
    pub fn parse(value: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub description: String,
    pub category: Category,
    /// Stored blob name; empty when the product has no image.
    pub image: String,
    pub created_at: DateTimeWithTimeZone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}
