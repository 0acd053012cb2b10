use diesel::prelude::*;

use crate::models::{Image, NewImage};
use crate::orm::scope::{TenantScope, company_machine_ids};

#[derive(Debug, Default)]
pub struct ImageFilter {
    pub id: Option<i32>,
    pub machine: Option<i32>,
}

pub fn list_images(
    conn: &mut SqliteConnection,
    scope: TenantScope,
    filter: &ImageFilter,
) -> Result<Vec<Image>, diesel::result::Error> {
    use crate::schema::images::dsl::*;

    let mut query = images.into_boxed();
    if let TenantScope::Company(c) = scope {
        let owned = company_machine_ids(conn, c)?;
        query = query.filter(machine_id.eq_any(owned));
    }
    if let Some(v) = filter.id {
        query = query.filter(id.eq(v));
    }
    if let Some(v) = filter.machine {
        query = query.filter(machine_id.eq(v));
    }
    query.order(id.asc()).load(conn)
}

pub fn get_image_by_id(
    conn: &mut SqliteConnection,
    image_id: i32,
) -> Result<Option<Image>, diesel::result::Error> {
    use crate::schema::images::dsl::*;
    images.filter(id.eq(image_id)).first(conn).optional()
}

pub fn insert_image(
    conn: &mut SqliteConnection,
    new_image: NewImage,
) -> Result<Image, diesel::result::Error> {
    use crate::schema::images::dsl::*;
    diesel::insert_into(images).values(&new_image).execute(conn)?;
    images.order(id.desc()).first(conn)
}

pub fn update_image(
    conn: &mut SqliteConnection,
    image_id: i32,
    new_title: Option<String>,
    new_file_path: Option<String>,
) -> Result<Image, diesel::result::Error> {
    use crate::schema::images::dsl::*;

    let current: Image = images.filter(id.eq(image_id)).first(conn)?;
    diesel::update(images.filter(id.eq(image_id)))
        .set((
            title.eq(new_title.unwrap_or(current.title)),
            file_path.eq(new_file_path.unwrap_or(current.file_path)),
        ))
        .execute(conn)?;
    images.filter(id.eq(image_id)).first(conn)
}

pub fn delete_image(
    conn: &mut SqliteConnection,
    image_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::images::dsl::*;
    diesel::delete(images.filter(id.eq(image_id))).execute(conn)
}

/// The company owning the machine this image is attached to.
pub fn company_of_image(
    conn: &mut SqliteConnection,
    image_id: i32,
) -> Result<Option<i32>, diesel::result::Error> {
    use crate::schema::{images, machines};
    images::table
        .inner_join(machines::table)
        .filter(images::id.eq(image_id))
        .select(machines::company_id)
        .first(conn)
        .optional()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::{seed_chain, setup_test_db};

    #[test]
    fn machine_filter_on_foreign_tenant_yields_empty() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");
        let b = seed_chain(&mut conn, "Beta");

        // Filtering by another tenant's machine id within a company scope
        // intersects to nothing rather than erroring.
        let filter = ImageFilter { machine: Some(b.machine.id), ..Default::default() };
        let rows = list_images(&mut conn, TenantScope::Company(a.company.id), &filter).unwrap();
        assert!(rows.is_empty());

        let filter = ImageFilter { machine: Some(a.machine.id), ..Default::default() };
        let rows = list_images(&mut conn, TenantScope::Company(a.company.id), &filter).unwrap();
        assert_eq!(rows.len(), 1);
    }
}
