use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub genre: String,
    pub actor: Option<String>,
    pub rating: Option<i32>,
    pub poster: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    #[sea_orm(unique)]
    pub imdb_id: Option<String>,
    pub imdb_rating: Option<String>,
    pub year: Option<String>,
    pub runtime: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub plot: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub awards: Option<String>,
    pub trailer: Option<String>,
    pub box_office: Option<String>,
    pub production: Option<String>,
    pub created_by: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
