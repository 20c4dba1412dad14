//! SurrealDB backend against an ephemeral in-memory database.

use catalog_engine::backend::{BackendError, CatalogBackend, SurrealBackend};
use shared::models::{CategoryCreate, CategoryUpdate, ProductCreate};

fn draft(name: &str, canonical_tag: Option<&str>) -> CategoryCreate {
    CategoryCreate {
        name: name.to_string(),
        canonical_tag: canonical_tag.map(|t| t.to_string()),
        color: None,
        image: None,
        description: None,
        is_special: None,
    }
}

#[tokio::test]
async fn category_crud_round_trip() {
    let backend = SurrealBackend::open_in_memory().await.unwrap();

    let created = backend
        .create_category(draft("Nike", Some("nike")))
        .await
        .unwrap();
    let id = created.id.clone().unwrap();
    assert_eq!(created.canonical_tag.as_deref(), Some("nike"));
    assert!(created.created_at.is_some());

    // Duplicate display name rejected
    let dup = backend.create_category(draft("Nike", None)).await;
    assert!(matches!(dup, Err(BackendError::Duplicate(_))));

    let listed = backend.list_categories().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id.as_deref(), Some(id.as_str()));

    let updated = backend
        .update_category(
            &id,
            CategoryUpdate {
                color: Some("#111111".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.color, "#111111");
    // Merge semantics: untouched fields survive
    assert_eq!(updated.name, "Nike");
    assert_eq!(updated.canonical_tag.as_deref(), Some("nike"));

    backend.delete_category(&id).await.unwrap();
    assert!(backend.list_categories().await.unwrap().is_empty());

    let missing = backend.delete_category("does-not-exist").await;
    assert!(matches!(missing, Err(BackendError::NotFound(_))));
}

#[tokio::test]
async fn product_tag_updates_round_trip() {
    let backend = SurrealBackend::open_in_memory().await.unwrap();

    let product = backend
        .create_product(ProductCreate {
            name: "Nike Zoom Vomero 5".to_string(),
            image: None,
            price: Some(15_000),
            category_tags: vec!["nike".to_string()],
        })
        .await
        .unwrap();
    let id = product.id.clone().unwrap();

    let updated = backend
        .update_product_categories(&id, vec!["nike".to_string(), "shoes".to_string()])
        .await
        .unwrap();
    assert_eq!(updated.category_tags, vec!["nike", "shoes"]);

    let listed = backend.list_products().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].category_tags, vec!["nike", "shoes"]);

    // Table-prefixed ids are accepted too
    let prefixed = backend
        .update_product_categories(&format!("product:{id}"), vec!["shoes".to_string()])
        .await
        .unwrap();
    assert_eq!(prefixed.category_tags, vec!["shoes"]);

    let missing = backend
        .update_product_categories("missing", vec![])
        .await;
    assert!(matches!(missing, Err(BackendError::NotFound(_))));
}
