use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
};
use tokio::sync::OnceCell;

use crate::{
    db,
    entities::movie,
    error::{AppError, AppResult},
    models::{Movie, MovieFields, MovieInput},
};

const DUPLICATE_MESSAGE: &str = "This movie is already in your collection";

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Newest first.
    pub async fn list(&self) -> AppResult<Vec<Movie>> {
        movie::Entity::find()
            .order_by_desc(movie::Column::CreatedAt)
            .order_by_desc(movie::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Movie::try_from)
            .collect()
    }

    pub async fn get(&self, id: i32) -> AppResult<Movie> {
        self.find(id).await?.try_into()
    }

    pub async fn create(&self, input: MovieInput) -> AppResult<Movie> {
        let fields = input.into_fields()?;
        if let Some(imdb_id) = &fields.imdb_id {
            self.ensure_unique(imdb_id, None).await?;
        }

        let now = now_ms();
        let mut active = movie::ActiveModel { ..Default::default() };
        write_fields(&mut active, fields);
        active.created_at = Set(now);
        active.updated_at = Set(now);

        let model = active.insert(&self.db).await.map_err(conflict_or_store)?;
        tracing::info!(id = model.id, title = %model.title, "movie added to collection");
        model.try_into()
    }

    /// Replaces only the fields present in `input`, then re-validates.
    pub async fn update(&self, id: i32, input: MovieInput) -> AppResult<Movie> {
        let existing = self.find(id).await?;
        let current = fields_of(&existing)?;
        let fields = input.apply_to(current)?;

        if let Some(imdb_id) = &fields.imdb_id {
            if existing.imdb_id.as_deref() != Some(imdb_id.as_str()) {
                self.ensure_unique(imdb_id, Some(id)).await?;
            }
        }

        let mut active: movie::ActiveModel = existing.into();
        write_fields(&mut active, fields);
        active.updated_at = Set(now_ms());

        let model = active.update(&self.db).await.map_err(conflict_or_store)?;
        tracing::debug!(id = model.id, "movie updated");
        model.try_into()
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(not_found());
        }
        tracing::info!(id = id, "movie removed from collection");
        Ok(())
    }

    async fn find(&self, id: i32) -> AppResult<movie::Model> {
        movie::Entity::find_by_id(id).one(&self.db).await?.ok_or_else(not_found)
    }

    async fn ensure_unique(&self, imdb_id: &str, except: Option<i32>) -> AppResult<()> {
        let mut query = movie::Entity::find().filter(movie::Column::ImdbId.eq(imdb_id));
        if let Some(id) = except {
            query = query.filter(movie::Column::Id.ne(id));
        }
        if query.one(&self.db).await?.is_some() {
            return Err(AppError::Conflict(DUPLICATE_MESSAGE.to_string()));
        }
        Ok(())
    }
}

/// Lazily connected collection store shared by every request. A failed
/// connect is retried on the next use.
pub struct StoreHandle {
    database_url: Option<String>,
    store: OnceCell<MovieStore>,
}

impl StoreHandle {
    pub fn new(database_url: Option<String>) -> Self {
        Self { database_url, store: OnceCell::new() }
    }

    pub fn connected(store: MovieStore) -> Self {
        Self { database_url: None, store: OnceCell::new_with(Some(store)) }
    }

    pub fn is_configured(&self) -> bool {
        self.database_url.is_some() || self.store.initialized()
    }

    pub async fn get(&self) -> AppResult<&MovieStore> {
        if let Some(store) = self.store.get() {
            return Ok(store);
        }
        let Some(url) = &self.database_url else {
            return Err(AppError::StoreUnavailable);
        };
        self.store
            .get_or_try_init(|| async { Ok::<_, AppError>(MovieStore::new(db::connect_and_migrate(url).await?)) })
            .await
    }
}

fn write_fields(active: &mut movie::ActiveModel, f: MovieFields) {
    active.title = Set(f.title);
    active.genre = Set(f.genre.as_str().to_string());
    active.actor = Set(f.actor);
    active.rating = Set(f.rating);
    active.poster = Set(f.poster);
    active.director = Set(f.director);
    active.cast = Set(f.cast);
    active.imdb_id = Set(f.imdb_id);
    active.imdb_rating = Set(f.imdb_rating);
    active.year = Set(f.year);
    active.runtime = Set(f.runtime);
    active.plot = Set(f.plot);
    active.country = Set(f.country);
    active.language = Set(f.language);
    active.awards = Set(f.awards);
    active.trailer = Set(f.trailer);
    active.box_office = Set(f.box_office);
    active.production = Set(f.production);
    active.created_by = Set(f.created_by);
}

fn fields_of(m: &movie::Model) -> AppResult<MovieFields> {
    let genre = m.genre.parse().map_err(|_| {
        AppError::Internal(anyhow::anyhow!("stored movie {} has unknown genre {:?}", m.id, m.genre))
    })?;
    Ok(MovieFields {
        title: m.title.clone(),
        genre,
        actor: m.actor.clone(),
        rating: m.rating,
        poster: m.poster.clone(),
        director: m.director.clone(),
        cast: m.cast.clone(),
        imdb_id: m.imdb_id.clone(),
        imdb_rating: m.imdb_rating.clone(),
        year: m.year.clone(),
        runtime: m.runtime.clone(),
        plot: m.plot.clone(),
        country: m.country.clone(),
        language: m.language.clone(),
        awards: m.awards.clone(),
        trailer: m.trailer.clone(),
        box_office: m.box_office.clone(),
        production: m.production.clone(),
        created_by: m.created_by.clone(),
    })
}

/// The unique index backs up the pre-insert check when two writers race.
fn conflict_or_store(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(DUPLICATE_MESSAGE.to_string()),
        _ => AppError::Store(err),
    }
}

fn not_found() -> AppError {
    AppError::not_found("Movie not found")
}

fn now_ms() -> i64 {
    jiff::Timestamp::now().as_millisecond()
}
