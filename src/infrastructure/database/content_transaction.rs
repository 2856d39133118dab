//! PostgreSQL Content Transaction
//!
//! Implements the [`ContentTransaction`] port on top of a SQLx transaction.
//! Table and column names come from the static relationship table, never
//! from request input, so they are interpolated into SQL text directly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{Postgres, Row, Transaction};

use crate::domain::{
    ChildRow, ChildRows, ContentEntity, ContentFields, ContentStatus, ContentTransaction,
    Deliverable, EntityKind, Faq, MediaRefs, ProcessStep, Relation, RowShape, TermFields,
};
use crate::shared::error::ContentError;

const SERVICE_COLUMNS: &str = r#"
    id, locale, slug, slug_group, title, excerpt, body, seo_title, seo_description,
    status, published_at, sort_order, hero_asset_id, og_asset_id,
    created_by, updated_by, created_at, updated_at
"#;

const POST_COLUMNS: &str = r#"
    id, locale, slug, NULL::text AS slug_group, title, excerpt, body, seo_title,
    seo_description, status, published_at, sort_order, hero_asset_id, og_asset_id,
    created_by, updated_by, created_at, updated_at
"#;

/// Database row representation shared by the `services` and `posts` tables.
#[derive(Debug, sqlx::FromRow)]
struct ContentRow {
    id: i64,
    locale: String,
    slug: String,
    slug_group: Option<String>,
    title: String,
    excerpt: Option<String>,
    body: Option<String>,
    seo_title: Option<String>,
    seo_description: Option<String>,
    status: String,
    published_at: Option<DateTime<Utc>>,
    sort_order: i32,
    hero_asset_id: Option<i64>,
    og_asset_id: Option<i64>,
    created_by: Option<i64>,
    updated_by: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ContentRow {
    /// Convert database row to domain ContentEntity.
    fn into_entity(self, kind: EntityKind) -> ContentEntity {
        ContentEntity {
            id: self.id,
            kind,
            fields: ContentFields {
                locale: self.locale,
                slug: self.slug,
                slug_group: self.slug_group,
                title: self.title,
                excerpt: self.excerpt,
                body: self.body,
                seo_title: self.seo_title,
                seo_description: self.seo_description,
                status: ContentStatus::from_db(&self.status),
                published_at: self.published_at,
                sort_order: self.sort_order,
                media: MediaRefs {
                    hero_asset_id: self.hero_asset_id,
                    og_asset_id: self.og_asset_id,
                },
            },
            created_by: self.created_by,
            updated_by: self.updated_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn content_columns(kind: EntityKind) -> Result<&'static str, ContentError> {
    match kind {
        EntityKind::Service => Ok(SERVICE_COLUMNS),
        EntityKind::Post => Ok(POST_COLUMNS),
        other => Err(not_content(other)),
    }
}

fn not_content(kind: EntityKind) -> ContentError {
    ContentError::Infrastructure(format!("{} rows have no content columns", kind))
}

fn shape_mismatch(relation: &Relation) -> ContentError {
    ContentError::Infrastructure(format!(
        "row does not match the shape of {}",
        relation.table
    ))
}

/// Bind the scalar content columns in table order, starting after any
/// parameters the caller already bound.
fn bind_fields<'q>(
    query: Query<'q, Postgres, PgArguments>,
    kind: EntityKind,
    fields: &'q ContentFields,
) -> Query<'q, Postgres, PgArguments> {
    let query = query.bind(&fields.locale).bind(&fields.slug);
    let query = if kind.has_slug_group() {
        query.bind(fields.slug_group.as_deref())
    } else {
        query
    };
    query
        .bind(&fields.title)
        .bind(fields.excerpt.as_deref())
        .bind(fields.body.as_deref())
        .bind(fields.seo_title.as_deref())
        .bind(fields.seo_description.as_deref())
        .bind(fields.status.as_str())
        .bind(fields.published_at)
        .bind(fields.sort_order)
        .bind(fields.media.hero_asset_id)
        .bind(fields.media.og_asset_id)
}

/// PostgreSQL implementation of the content transaction port.
pub struct PgContentTransaction {
    tx: Transaction<'static, Postgres>,
}

impl PgContentTransaction {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl ContentTransaction for PgContentTransaction {
    async fn insert_entity(
        &mut self,
        kind: EntityKind,
        fields: &ContentFields,
        actor: Option<i64>,
    ) -> Result<i64, ContentError> {
        let sql = match kind {
            EntityKind::Service => {
                r#"
                INSERT INTO services (locale, slug, slug_group, title, excerpt, body, seo_title,
                                      seo_description, status, published_at, sort_order,
                                      hero_asset_id, og_asset_id, created_by, updated_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                RETURNING id
                "#
            }
            EntityKind::Post => {
                r#"
                INSERT INTO posts (locale, slug, title, excerpt, body, seo_title,
                                   seo_description, status, published_at, sort_order,
                                   hero_asset_id, og_asset_id, created_by, updated_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                RETURNING id
                "#
            }
            other => return Err(not_content(other)),
        };

        let row = bind_fields(sqlx::query(sql), kind, fields)
            .bind(actor)
            .bind(actor)
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(row.try_get("id")?)
    }

    async fn update_entity(
        &mut self,
        kind: EntityKind,
        id: i64,
        fields: &ContentFields,
        actor: Option<i64>,
    ) -> Result<u64, ContentError> {
        let sql = match kind {
            EntityKind::Service => {
                r#"
                UPDATE services
                SET locale = $2, slug = $3, slug_group = COALESCE($4, slug_group),
                    title = $5, excerpt = $6,
                    body = $7, seo_title = $8, seo_description = $9, status = $10,
                    published_at = $11, sort_order = $12, hero_asset_id = $13,
                    og_asset_id = $14, updated_by = $15, updated_at = NOW()
                WHERE id = $1
                "#
            }
            EntityKind::Post => {
                r#"
                UPDATE posts
                SET locale = $2, slug = $3, title = $4, excerpt = $5, body = $6,
                    seo_title = $7, seo_description = $8, status = $9, published_at = $10,
                    sort_order = $11, hero_asset_id = $12, og_asset_id = $13,
                    updated_by = $14, updated_at = NOW()
                WHERE id = $1
                "#
            }
            other => return Err(not_content(other)),
        };

        let result = bind_fields(sqlx::query(sql).bind(id), kind, fields)
            .bind(actor)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn find_entity(
        &mut self,
        kind: EntityKind,
        id: i64,
    ) -> Result<Option<ContentEntity>, ContentError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            content_columns(kind)?,
            kind.table()
        );

        let row = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(row.map(|r| r.into_entity(kind)))
    }

    async fn find_by_slug_group(
        &mut self,
        kind: EntityKind,
        slug_group: &str,
    ) -> Result<Vec<ContentEntity>, ContentError> {
        if !kind.has_slug_group() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM {} WHERE slug_group = $1 ORDER BY id",
            content_columns(kind)?,
            kind.table()
        );

        let rows = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(slug_group)
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(rows.into_iter().map(|r| r.into_entity(kind)).collect())
    }

    async fn slug_taken(
        &mut self,
        kind: EntityKind,
        locale: &str,
        slug: &str,
        excluding: Option<i64>,
    ) -> Result<bool, ContentError> {
        let sql = format!(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM {}
                WHERE locale = $1 AND slug = $2 AND ($3::BIGINT IS NULL OR id <> $3)
            )
            "#,
            kind.table()
        );

        let taken = sqlx::query_scalar::<_, bool>(&sql)
            .bind(locale)
            .bind(slug)
            .bind(excluding)
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(taken)
    }

    async fn update_group_media(
        &mut self,
        kind: EntityKind,
        slug_group: &str,
        media: MediaRefs,
        excluding: i64,
    ) -> Result<u64, ContentError> {
        if !kind.has_slug_group() {
            return Ok(0);
        }

        let sql = format!(
            r#"
            UPDATE {}
            SET hero_asset_id = $2, og_asset_id = $3
            WHERE slug_group = $1 AND id <> $4
            "#,
            kind.table()
        );

        let result = sqlx::query(&sql)
            .bind(slug_group)
            .bind(media.hero_asset_id)
            .bind(media.og_asset_id)
            .bind(excluding)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_rows(
        &mut self,
        table: &'static str,
        column: &'static str,
        id: i64,
    ) -> Result<u64, ContentError> {
        let sql = format!("DELETE FROM {} WHERE {} = $1", table, column);

        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn insert_child(
        &mut self,
        relation: &'static Relation,
        parent_id: i64,
        sort_order: Option<i32>,
        row: ChildRow<'_>,
    ) -> Result<(), ContentError> {
        let position = sort_order.unwrap_or_default();

        match (row, relation.target) {
            (ChildRow::Link(target_id), Some(target)) => {
                let sql = if relation.ordered {
                    format!(
                        "INSERT INTO {} ({}, {}, sort_order) VALUES ($1, $2, $3)",
                        relation.table, relation.owner_column, target.column
                    )
                } else {
                    format!(
                        "INSERT INTO {} ({}, {}) VALUES ($1, $2)",
                        relation.table, relation.owner_column, target.column
                    )
                };
                let query = sqlx::query(&sql).bind(parent_id).bind(target_id);
                let query = if relation.ordered {
                    query.bind(position)
                } else {
                    query
                };
                query.execute(&mut *self.tx).await?;
            }
            (ChildRow::Deliverable(d), None) if relation.shape == RowShape::Deliverable => {
                self.insert_owned(relation, parent_id, &d.title, d.description.as_deref(), position)
                    .await?;
            }
            (ChildRow::ProcessStep(s), None) if relation.shape == RowShape::ProcessStep => {
                self.insert_owned(relation, parent_id, &s.title, s.description.as_deref(), position)
                    .await?;
            }
            (ChildRow::Faq(faq), None) if relation.shape == RowShape::Faq => {
                let sql = format!(
                    "INSERT INTO {} ({}, question, answer, sort_order) VALUES ($1, $2, $3, $4)",
                    relation.table, relation.owner_column
                );
                sqlx::query(&sql)
                    .bind(parent_id)
                    .bind(&faq.question)
                    .bind(&faq.answer)
                    .bind(position)
                    .execute(&mut *self.tx)
                    .await?;
            }
            _ => return Err(shape_mismatch(relation)),
        }

        Ok(())
    }

    async fn load_children(
        &mut self,
        relation: &'static Relation,
        parent_id: i64,
    ) -> Result<ChildRows, ContentError> {
        match (relation.shape, relation.target) {
            (RowShape::Link, Some(target)) => {
                let order = if relation.ordered {
                    "sort_order"
                } else {
                    target.column
                };
                let sql = format!(
                    "SELECT {} FROM {} WHERE {} = $1 ORDER BY {}",
                    target.column, relation.table, relation.owner_column, order
                );
                let ids = sqlx::query_scalar::<_, i64>(&sql)
                    .bind(parent_id)
                    .fetch_all(&mut *self.tx)
                    .await?;
                Ok(ChildRows::Links(ids))
            }
            (RowShape::Deliverable, None) => {
                let rows = self.load_owned(relation, parent_id).await?;
                Ok(ChildRows::Deliverables(
                    rows.into_iter()
                        .map(|(title, description)| Deliverable { title, description })
                        .collect(),
                ))
            }
            (RowShape::ProcessStep, None) => {
                let rows = self.load_owned(relation, parent_id).await?;
                Ok(ChildRows::ProcessSteps(
                    rows.into_iter()
                        .map(|(title, description)| ProcessStep { title, description })
                        .collect(),
                ))
            }
            (RowShape::Faq, None) => {
                let sql = format!(
                    "SELECT question, answer FROM {} WHERE {} = $1 ORDER BY sort_order, id",
                    relation.table, relation.owner_column
                );
                let rows = sqlx::query_as::<_, (String, String)>(&sql)
                    .bind(parent_id)
                    .fetch_all(&mut *self.tx)
                    .await?;
                Ok(ChildRows::Faqs(
                    rows.into_iter()
                        .map(|(question, answer)| Faq { question, answer })
                        .collect(),
                ))
            }
            _ => Err(shape_mismatch(relation)),
        }
    }

    async fn delete_entity(&mut self, kind: EntityKind, id: i64) -> Result<u64, ContentError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());

        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn insert_term(
        &mut self,
        kind: EntityKind,
        fields: &TermFields,
    ) -> Result<i64, ContentError> {
        if kind.is_content() {
            return Err(ContentError::Infrastructure(format!(
                "{} is not a taxonomy kind",
                kind
            )));
        }

        let sql = format!(
            "INSERT INTO {} (locale, name, slug) VALUES ($1, $2, $3) RETURNING id",
            kind.table()
        );

        let id = sqlx::query_scalar::<_, i64>(&sql)
            .bind(&fields.locale)
            .bind(&fields.name)
            .bind(&fields.slug)
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(id)
    }

    async fn commit(self) -> Result<(), ContentError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), ContentError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

impl PgContentTransaction {
    /// Insert a `(title, description)` owned-child row.
    async fn insert_owned(
        &mut self,
        relation: &Relation,
        parent_id: i64,
        title: &str,
        description: Option<&str>,
        position: i32,
    ) -> Result<(), ContentError> {
        let sql = format!(
            "INSERT INTO {} ({}, title, description, sort_order) VALUES ($1, $2, $3, $4)",
            relation.table, relation.owner_column
        );

        sqlx::query(&sql)
            .bind(parent_id)
            .bind(title)
            .bind(description)
            .bind(position)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    /// Load `(title, description)` owned-child rows in stored order.
    async fn load_owned(
        &mut self,
        relation: &Relation,
        parent_id: i64,
    ) -> Result<Vec<(String, Option<String>)>, ContentError> {
        let sql = format!(
            "SELECT title, description FROM {} WHERE {} = $1 ORDER BY sort_order, id",
            relation.table, relation.owner_column
        );

        let rows = sqlx::query_as::<_, (String, Option<String>)>(&sql)
            .bind(parent_id)
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(rows)
    }
}
