use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "Movie_Name", column_type = "Text")]
    pub movie_name: String,
    #[sea_orm(column_name = "Description", column_type = "Text")]
    pub description: String,
    #[sea_orm(column_name = "Casting", column_type = "Text")]
    pub casting: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
