use diesel::prelude::*;

use crate::models::{NewTermoImage, TermoImage};
use crate::orm::scope::{TenantScope, company_measurement_ids};

#[derive(Debug, Default)]
pub struct TermoImageFilter {
    pub id: Option<i32>,
    pub image_type: Option<String>,
    pub measurement: Option<i32>,
}

pub fn list_termo_images(
    conn: &mut SqliteConnection,
    scope: TenantScope,
    filter: &TermoImageFilter,
) -> Result<Vec<TermoImage>, diesel::result::Error> {
    use crate::schema::termo_images::dsl::*;

    let mut query = termo_images.into_boxed();
    if let TenantScope::Company(c) = scope {
        let owned = company_measurement_ids(conn, c)?;
        query = query.filter(measurement_id.eq_any(owned));
    }
    if let Some(v) = filter.id {
        query = query.filter(id.eq(v));
    }
    if let Some(v) = &filter.image_type {
        query = query.filter(image_type.eq(v.clone()));
    }
    if let Some(v) = filter.measurement {
        query = query.filter(measurement_id.eq(v));
    }
    query.order(id.asc()).load(conn)
}

pub fn get_termo_image_by_id(
    conn: &mut SqliteConnection,
    termo_image_id: i32,
) -> Result<Option<TermoImage>, diesel::result::Error> {
    use crate::schema::termo_images::dsl::*;
    termo_images.filter(id.eq(termo_image_id)).first(conn).optional()
}

pub fn insert_termo_image(
    conn: &mut SqliteConnection,
    new_termo_image: NewTermoImage,
) -> Result<TermoImage, diesel::result::Error> {
    use crate::schema::termo_images::dsl::*;
    diesel::insert_into(termo_images).values(&new_termo_image).execute(conn)?;
    termo_images.order(id.desc()).first(conn)
}

pub fn update_termo_image(
    conn: &mut SqliteConnection,
    termo_image_id: i32,
    new_image_type: Option<String>,
    new_file_path: Option<String>,
) -> Result<TermoImage, diesel::result::Error> {
    use crate::schema::termo_images::dsl::*;

    let current: TermoImage = termo_images.filter(id.eq(termo_image_id)).first(conn)?;
    diesel::update(termo_images.filter(id.eq(termo_image_id)))
        .set((
            image_type.eq(new_image_type.unwrap_or(current.image_type)),
            file_path.eq(new_file_path.unwrap_or(current.file_path)),
        ))
        .execute(conn)?;
    termo_images.filter(id.eq(termo_image_id)).first(conn)
}

pub fn delete_termo_image(
    conn: &mut SqliteConnection,
    termo_image_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::termo_images::dsl::*;
    diesel::delete(termo_images.filter(id.eq(termo_image_id))).execute(conn)
}

/// The company reachable from this thermographic image's measurement.
pub fn company_of_termo_image(
    conn: &mut SqliteConnection,
    termo_image_id: i32,
) -> Result<Option<i32>, diesel::result::Error> {
    use crate::schema::{machines, measurements, termo_images};
    termo_images::table
        .inner_join(measurements::table.inner_join(machines::table))
        .filter(termo_images::id.eq(termo_image_id))
        .select(machines::company_id)
        .first(conn)
        .optional()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::{seed_chain, setup_test_db};

    #[test]
    fn scope_follows_the_measurement_chain() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");
        let b = seed_chain(&mut conn, "Beta");

        let rows = list_termo_images(
            &mut conn,
            TenantScope::Company(a.company.id),
            &TermoImageFilter::default(),
        )
        .unwrap();
        assert_eq!(rows.iter().map(|t| t.id).collect::<Vec<_>>(), vec![a.termo_image.id]);

        assert_eq!(
            company_of_termo_image(&mut conn, b.termo_image.id).unwrap(),
            Some(b.company.id)
        );
    }
}
