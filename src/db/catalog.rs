use rusqlite::params;
use std::collections::BTreeMap;
use tracing::info;

use crate::db::connection::Database;
use crate::domain::catalog::{Catalog, CatalogRow};
use crate::domain::listing::{CanonicalListing, PetPolicy, School, MAX_SCHOOLS};
use crate::domain::region::Region;
use crate::errors::{PipelineError, PipelineResult};

/// Replaces the stored catalog with `catalog` in one transaction.
pub fn save_catalog(db: &Database, catalog: &Catalog) -> PipelineResult<()> {
    db.with_conn(|conn| {
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM catalog_schools", [])?;
        tx.execute("DELETE FROM catalog_facility_counts", [])?;
        tx.execute("DELETE FROM catalog_listings", [])?;
        tx.execute("DELETE FROM catalog_categories", [])?;

        for (position, category) in catalog.categories.iter().enumerate() {
            tx.execute(
                "INSERT INTO catalog_categories (position, category) VALUES (?1, ?2)",
                params![position as i64, category],
            )?;
        }

        for (row_id, row) in catalog.rows.iter().enumerate() {
            let l = &row.listing;
            tx.execute(
                r#"
                INSERT INTO catalog_listings (
                    row_id, address, apartment_name, rent, average_rent,
                    zip_code, city, boro, if_pets_allowed,
                    features, appliances, incidents_reported, safety_level
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
                params![
                    row_id as i64,
                    l.address,
                    l.apartment_name,
                    l.rent,
                    l.average_rent,
                    l.zip_code,
                    l.city,
                    l.region.as_str(),
                    l.pet_policy.as_str(),
                    l.features,
                    l.appliances,
                    row.incidents_reported,
                    row.safety_level,
                ],
            )?;

            for (category, count) in &row.facility_counts {
                tx.execute(
                    "INSERT INTO catalog_facility_counts (row_id, category, count) VALUES (?1, ?2, ?3)",
                    params![row_id as i64, category, *count as i64],
                )?;
            }

            for (slot, school) in l.schools.iter().enumerate() {
                if school.is_empty() {
                    continue;
                }
                tx.execute(
                    r#"
                    INSERT INTO catalog_schools (row_id, slot, school_name, grades, school_rank, school_rating)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                    params![
                        row_id as i64,
                        slot as i64,
                        school.name,
                        school.grades,
                        school.rank,
                        school.rating,
                    ],
                )?;
            }
        }

        tx.commit()
            .map_err(|e| PipelineError::Db(format!("Commit catalog failed: {e}")))?;
        Ok(())
    })?;

    info!(rows = catalog.len(), db = %db.path().display(), "Catalog saved");
    Ok(())
}

/// Rebuilds the catalog saved by [`save_catalog`], rows in their original order.
pub fn load_catalog(db: &Database) -> PipelineResult<Catalog> {
    db.with_conn(|conn| {
        let mut stmt =
            conn.prepare("SELECT category FROM catalog_categories ORDER BY position")?;
        let categories = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare("SELECT row_id, category, count FROM catalog_facility_counts")?;
        let mut counts: BTreeMap<i64, BTreeMap<String, u64>> = BTreeMap::new();
        let count_rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;
        for r in count_rows {
            let (row_id, category, count) = r?;
            counts
                .entry(row_id)
                .or_default()
                .insert(category, count.max(0) as u64);
        }

        let mut stmt = conn.prepare(
            "SELECT row_id, slot, school_name, grades, school_rank, school_rating FROM catalog_schools",
        )?;
        let mut schools: BTreeMap<i64, [School; MAX_SCHOOLS]> = BTreeMap::new();
        let school_rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                School {
                    name: row.get(2)?,
                    grades: row.get(3)?,
                    rank: row.get(4)?,
                    rating: row.get(5)?,
                },
            ))
        })?;
        for r in school_rows {
            let (row_id, slot, school) = r?;
            let slot = usize::try_from(slot)
                .ok()
                .filter(|s| *s < MAX_SCHOOLS)
                .ok_or_else(|| PipelineError::Db(format!("School slot {slot} out of range")))?;
            schools.entry(row_id).or_default()[slot] = school;
        }

        let mut stmt = conn.prepare(
            r#"
            SELECT
                row_id,              -- 0
                address,             -- 1
                apartment_name,      -- 2
                rent,                -- 3
                average_rent,        -- 4
                zip_code,            -- 5
                city,                -- 6
                boro,                -- 7
                if_pets_allowed,     -- 8
                features,            -- 9
                appliances,          -- 10
                incidents_reported,  -- 11
                safety_level         -- 12
            FROM catalog_listings
            ORDER BY row_id
            "#,
        )?;

        let listing_rows = stmt.query_map([], |row| {
            let row_id: i64 = row.get(0)?;
            let listing = CanonicalListing {
                address: row.get(1)?,
                apartment_name: row.get(2)?,
                rent: row.get(3)?,
                average_rent: row.get(4)?,
                zip_code: row.get(5)?,
                city: row.get(6)?,
                region: Region::from_name(&row.get::<_, String>(7)?),
                pet_policy: PetPolicy::from_label(&row.get::<_, String>(8)?),
                features: row.get(9)?,
                appliances: row.get(10)?,
                schools: Default::default(),
            };
            Ok((row_id, listing, row.get::<_, bool>(11)?, row.get::<_, String>(12)?))
        })?;

        let mut rows = Vec::new();
        for r in listing_rows {
            let (row_id, mut listing, incidents_reported, safety_level) = r?;
            listing.schools = schools.remove(&row_id).unwrap_or_default();
            let stored = counts.remove(&row_id).unwrap_or_default();
            // Categories with no stored count still get an explicit zero.
            let facility_counts = categories
                .iter()
                .map(|c| (c.clone(), stored.get(c).copied().unwrap_or(0)))
                .collect();
            rows.push(CatalogRow {
                listing,
                facility_counts,
                incidents_reported,
                safety_level,
            });
        }

        Ok(Catalog::new(categories, rows))
    })
}
