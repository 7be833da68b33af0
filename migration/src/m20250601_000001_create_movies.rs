use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string(Movies::Title))
                    .col(string(Movies::Genre))
                    .col(string_null(Movies::Actor))
                    .col(integer_null(Movies::Rating))
                    .col(string_null(Movies::Poster))
                    .col(string_null(Movies::Director))
                    .col(string_null(Movies::Cast))
                    .col(string_null(Movies::ImdbId))
                    .col(string_null(Movies::ImdbRating))
                    .col(string_null(Movies::Year))
                    .col(string_null(Movies::Runtime))
                    .col(text_null(Movies::Plot))
                    .col(string_null(Movies::Country))
                    .col(string_null(Movies::Language))
                    .col(string_null(Movies::Awards))
                    .col(string_null(Movies::Trailer))
                    .col(string_null(Movies::BoxOffice))
                    .col(string_null(Movies::Production))
                    .col(big_integer(Movies::CreatedAt))
                    .col(big_integer(Movies::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // SQLite treats NULLs as distinct, so records without an IMDb ID never collide.
        manager
            .create_index(
                Index::create()
                    .name("idx_movies_imdb_id_unique")
                    .table(Movies::Table)
                    .col(Movies::ImdbId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_genre")
                    .table(Movies::Table)
                    .col(Movies::Genre)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_created_at")
                    .table(Movies::Table)
                    .col(Movies::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    Genre,
    Actor,
    Rating,
    Poster,
    Director,
    Cast,
    ImdbId,
    ImdbRating,
    Year,
    Runtime,
    Plot,
    Country,
    Language,
    Awards,
    Trailer,
    BoxOffice,
    Production,
    CreatedAt,
    UpdatedAt,
}
