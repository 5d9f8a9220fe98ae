//! Live integration tests for rxp-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/rxp-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory. They need `DATABASE_URL`, so they are ignored by
//! default: `cargo test -p rxp-db -- --ignored`.

use rxp_core::{parse_catalog, CatalogFile};
use rxp_db::{
    check_schema, get_drug_by_rx_cui, get_zip, health_check, list_recent_search_queries,
    record_search_query, search_drugs_by_prefix, seed_catalog, DbError, SeedSummary,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn test_catalog() -> CatalogFile {
    parse_catalog(
        r#"
drugs:
  - rx_cui: "723"
    name: Amoxicillin
    forms: [capsule, tablet]
    strengths: ["250 mg", "500 mg"]
  - rx_cui: "617314"
    name: Atorvastatin
    forms: [tablet]
    strengths: ["10 mg"]
  - rx_cui: "351457"
    name: Metformin
    forms: [tablet]
    strengths: ["500 mg"]
  - rx_cui: "999001"
    name: "50%_Solution"
    forms: [liquid]
    strengths: ["5 ml"]
zips:
  - zip: "78701"
    latitude: 30.2711
    longitude: -97.7437
    city: Austin
    state: TX
"#,
    )
    .expect("test catalog should parse")
}

async fn seeded(pool: &sqlx::PgPool) {
    seed_catalog(pool, &test_catalog())
        .await
        .expect("seed_catalog failed");
}

// ---------------------------------------------------------------------------
// Section 1: Seeding
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn seed_catalog_reports_counts(pool: sqlx::PgPool) {
    let summary = seed_catalog(&pool, &test_catalog())
        .await
        .expect("seed_catalog failed");
    assert_eq!(summary, SeedSummary { drugs: 4, zips: 1 });
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn seed_catalog_is_idempotent_and_updates_rows(pool: sqlx::PgPool) {
    seeded(&pool).await;

    let mut catalog = test_catalog();
    catalog.drugs[0].name = "Amoxicillin Trihydrate".to_string();
    seed_catalog(&pool, &catalog)
        .await
        .expect("second seed failed");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM drugs")
        .fetch_one(&pool)
        .await
        .expect("count failed");
    assert_eq!(count, 4);

    let row = get_drug_by_rx_cui(&pool, "723")
        .await
        .expect("lookup failed")
        .expect("drug should exist");
    assert_eq!(row.name, "Amoxicillin Trihydrate");
}

// ---------------------------------------------------------------------------
// Section 2: Drug lookup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn prefix_search_is_case_insensitive_and_ordered(pool: sqlx::PgPool) {
    seeded(&pool).await;

    let rows = search_drugs_by_prefix(&pool, "A", 10)
        .await
        .expect("search failed");
    let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Amoxicillin", "Atorvastatin"]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn prefix_search_respects_limit(pool: sqlx::PgPool) {
    seeded(&pool).await;

    let rows = search_drugs_by_prefix(&pool, "a", 1)
        .await
        .expect("search failed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Amoxicillin");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn prefix_search_treats_wildcards_literally(pool: sqlx::PgPool) {
    seeded(&pool).await;

    let rows = search_drugs_by_prefix(&pool, "%", 10)
        .await
        .expect("search failed");
    assert!(rows.is_empty());

    let rows = search_drugs_by_prefix(&pool, "50%_", 10)
        .await
        .expect("search failed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].rx_cui, "999001");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn get_drug_by_rx_cui_returns_none_for_unknown(pool: sqlx::PgPool) {
    seeded(&pool).await;

    let row = get_drug_by_rx_cui(&pool, "000000")
        .await
        .expect("lookup failed");
    assert!(row.is_none());
}

// ---------------------------------------------------------------------------
// Section 3: ZIP lookup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn get_zip_returns_coordinates(pool: sqlx::PgPool) {
    seeded(&pool).await;

    let row = get_zip(&pool, "78701")
        .await
        .expect("lookup failed")
        .expect("zip should exist");
    assert!((row.latitude - 30.2711).abs() < 1e-9);
    assert_eq!(row.city.as_deref(), Some("Austin"));

    assert!(get_zip(&pool, "00000").await.expect("lookup failed").is_none());
}

// ---------------------------------------------------------------------------
// Section 4: Audit log
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn search_queries_list_newest_first(pool: sqlx::PgPool) {
    let first = record_search_query(&pool, "723", "500 mg", 30, "78701")
        .await
        .expect("record failed");
    let second = record_search_query(&pool, "617314", "10 mg", 90, "10001")
        .await
        .expect("record failed");
    assert!(second > first);

    let rows = list_recent_search_queries(&pool, 10)
        .await
        .expect("list failed");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, second);
    assert_eq!(rows[0].quantity, 90);
    assert_eq!(rows[1].zip, "78701");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn list_recent_rejects_non_positive_limit(pool: sqlx::PgPool) {
    let err = list_recent_search_queries(&pool, 0).await.unwrap_err();
    assert!(matches!(err, DbError::OutOfRange { .. }));
}

// ---------------------------------------------------------------------------
// Section 5: Health
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn schema_check_sees_drug_table(pool: sqlx::PgPool) {
    health_check(&pool).await.expect("health check failed");
    let check = check_schema(&pool).await.expect("schema check failed");
    assert!(check.drug_table_exists);
}

// ---------------------------------------------------------------------------
// Section 6: Search collaborators
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn pg_collaborators_serve_the_search_engine(pool: sqlx::PgPool) {
    use rxp_db::PgCollaborators;
    use rxp_pricing::{DrugCatalog, SearchAudit, SearchAuditEntry, ZipLookup};

    seeded(&pool).await;
    let pg = PgCollaborators::new(pool.clone());

    let drug = pg.find("723").await.expect("find").expect("known drug");
    assert_eq!(drug.primary_form(), "capsule");

    let hits = pg.suggest("at", 10).await.expect("suggest");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Atorvastatin");

    let zip = pg.locate("78701").await.expect("locate").expect("known zip");
    assert_eq!(zip.state.as_deref(), Some("TX"));

    pg.record(&SearchAuditEntry {
        rx_cui: "723".to_string(),
        strength: "500 mg".to_string(),
        quantity: 30,
        zip: "78701".to_string(),
        recorded_at: chrono::Utc::now(),
    })
    .await
    .expect("record");
    let rows = list_recent_search_queries(&pool, 1).await.expect("list");
    assert_eq!(rows[0].rx_cui, "723");
}
