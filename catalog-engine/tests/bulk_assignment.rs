//! End-to-end bulk assignment against the in-memory backend:
//! partial failure, orphan pruning, and the persist-then-commit rule.

use async_trait::async_trait;
use catalog_engine::backend::{BackendResult, CatalogBackend};
use catalog_engine::{
    AssignmentMode, BulkAssignmentEngine, MemoryBackend, ProductStore, compute_assignment,
    orphaned_tags,
};
use parking_lot::Mutex;
use shared::error::CatalogError;
use shared::models::{Category, CategoryCreate, CategoryUpdate, Product};
use std::sync::Arc;
use tokio::sync::{Semaphore, oneshot};

fn category(id: &str, name: &str) -> Category {
    Category {
        id: Some(id.to_string()),
        canonical_tag: None,
        name: name.to_string(),
        color: String::new(),
        image: String::new(),
        description: String::new(),
        is_special: false,
        created_at: None,
        updated_at: None,
    }
}

fn product(id: &str, tags: &[&str]) -> Product {
    Product {
        id: Some(id.to_string()),
        name: format!("Product {id}"),
        image: String::new(),
        price: None,
        category_tags: tags.iter().map(|t| t.to_string()).collect(),
        updated_at: None,
    }
}

fn find<'a>(products: &'a [Product], id: &str) -> &'a Product {
    products
        .iter()
        .find(|p| p.id.as_deref() == Some(id))
        .unwrap()
}

#[tokio::test]
async fn bulk_replace_tolerates_partial_failure() {
    let backend = Arc::new(MemoryBackend::with_data(
        vec![],
        vec![product("p1", &["c1", "shoes"]), product("p2", &["c1"])],
    ));
    backend.fail_writes_for("p2");

    let store = Arc::new(ProductStore::new(backend.clone()));
    let products = store.list().await.unwrap();
    let categories = vec![category("c1", "Nike"), category("c2", "Shoes")];

    let plan = compute_assignment(
        &products,
        &categories,
        &["c2".to_string()],
        &[],
        AssignmentMode::Replace,
    )
    .unwrap();

    let engine = BulkAssignmentEngine::new(store.clone());
    let outcome = engine.apply(plan).await.unwrap();

    assert_eq!(outcome.succeeded, 1);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].product_id, "p2");

    // p1's successful write stuck; p2 kept its old tags
    let refreshed = store.list().await.unwrap();
    assert_eq!(find(&refreshed, "p1").category_tags, vec!["c2".to_string()]);
    assert_eq!(find(&refreshed, "p2").category_tags, vec!["c1".to_string()]);
}

#[tokio::test]
async fn failed_write_leaves_working_set_unchanged() {
    let backend = Arc::new(MemoryBackend::with_data(
        vec![],
        vec![product("p1", &["nike"])],
    ));
    backend.fail_writes_for("p1");

    let store = ProductStore::new(backend);
    store.list().await.unwrap();

    let err = store
        .set_category_tags("p1", vec!["shoes".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::PersistenceFailed { .. }));

    // No optimistic commit
    assert_eq!(
        find(&store.cached(), "p1").category_tags,
        vec!["nike".to_string()]
    );
}

#[tokio::test]
async fn prune_orphans_dry_run_never_writes() {
    let backend = Arc::new(MemoryBackend::with_data(
        vec![],
        vec![product("p1", &["nike", "ghost-brand"])],
    ));
    let store = Arc::new(ProductStore::new(backend));
    let products = store.list().await.unwrap();
    let categories = vec![category("c1", "Nike")];

    let engine = BulkAssignmentEngine::new(store.clone());
    let reports = engine
        .prune_orphans(&products, &categories, true)
        .await
        .unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].product_id, "p1");
    assert_eq!(reports[0].removed, vec!["ghost-brand".to_string()]);
    assert!(reports[0].error.is_none());

    // Still orphaned: nothing was written
    let unchanged = store.list().await.unwrap();
    assert_eq!(
        orphaned_tags(find(&unchanged, "p1"), &categories),
        vec!["ghost-brand".to_string()]
    );
}

#[tokio::test]
async fn prune_orphans_commit_removes_only_orphans() {
    let backend = Arc::new(MemoryBackend::with_data(
        vec![],
        vec![
            product("p1", &["nike", "ghost-brand"]),
            product("p2", &["nike"]),
        ],
    ));
    let store = Arc::new(ProductStore::new(backend));
    let products = store.list().await.unwrap();
    let categories = vec![category("c1", "Nike")];

    let engine = BulkAssignmentEngine::new(store.clone());
    let reports = engine
        .prune_orphans(&products, &categories, false)
        .await
        .unwrap();

    // p2 had no orphans, so only p1 is reported and written
    assert_eq!(reports.len(), 1);
    assert!(reports[0].error.is_none());

    let refreshed = store.list().await.unwrap();
    let p1 = find(&refreshed, "p1");
    assert_eq!(p1.category_tags, vec!["nike".to_string()]);
    assert!(orphaned_tags(p1, &categories).is_empty());
    assert_eq!(find(&refreshed, "p2").category_tags, vec!["nike".to_string()]);
}

/// Delegates to a [`MemoryBackend`] but parks product writes on a
/// semaphore, so a test can hold a batch open mid-APPLYING. Signals
/// through `entered` when the first write arrives.
struct GatedBackend {
    inner: MemoryBackend,
    gate: Arc<Semaphore>,
    entered: Mutex<Option<oneshot::Sender<()>>>,
}

#[async_trait]
impl CatalogBackend for GatedBackend {
    async fn list_categories(&self) -> BackendResult<Vec<Category>> {
        self.inner.list_categories().await
    }

    async fn create_category(&self, draft: CategoryCreate) -> BackendResult<Category> {
        self.inner.create_category(draft).await
    }

    async fn update_category(&self, id: &str, patch: CategoryUpdate) -> BackendResult<Category> {
        self.inner.update_category(id, patch).await
    }

    async fn delete_category(&self, id: &str) -> BackendResult<()> {
        self.inner.delete_category(id).await
    }

    async fn list_products(&self) -> BackendResult<Vec<Product>> {
        self.inner.list_products().await
    }

    async fn update_product_categories(
        &self,
        id: &str,
        tags: Vec<String>,
    ) -> BackendResult<Product> {
        if let Some(tx) = self.entered.lock().take() {
            let _ = tx.send(());
        }
        let permit = self.gate.acquire().await.expect("gate closed");
        permit.forget();
        self.inner.update_product_categories(id, tags).await
    }
}

#[tokio::test]
async fn second_batch_is_rejected_while_one_is_applying() {
    let (tx, rx) = oneshot::channel();
    let gate = Arc::new(Semaphore::new(0));
    let backend = Arc::new(GatedBackend {
        inner: MemoryBackend::with_data(vec![], vec![product("p1", &["c1", "ghost-brand"])]),
        gate: gate.clone(),
        entered: Mutex::new(Some(tx)),
    });

    let store = Arc::new(ProductStore::new(backend));
    let products = store.list().await.unwrap();
    let categories = vec![category("c1", "Nike"), category("c2", "Shoes")];
    let plan = compute_assignment(
        &products,
        &categories,
        &["c2".to_string()],
        &[],
        AssignmentMode::Replace,
    )
    .unwrap();

    let engine = Arc::new(BulkAssignmentEngine::new(store.clone()));
    let first = tokio::spawn({
        let engine = engine.clone();
        let plan = plan.clone();
        async move { engine.apply(plan).await }
    });

    // First batch has reached its (parked) write: it is applying now
    rx.await.unwrap();

    let second = engine.apply(plan.clone()).await;
    assert!(matches!(second, Err(CatalogError::BatchInProgress)));

    let wet_prune = engine.prune_orphans(&products, &categories, false).await;
    assert!(matches!(wet_prune, Err(CatalogError::BatchInProgress)));

    // A dry run is pure and stays available mid-batch
    let dry = engine
        .prune_orphans(&products, &categories, true)
        .await
        .unwrap();
    assert_eq!(dry.len(), 1);
    assert_eq!(dry[0].removed, vec!["ghost-brand".to_string()]);

    // Release the parked write; the first batch completes normally
    gate.add_permits(1);
    let outcome = first.await.unwrap().unwrap();
    assert_eq!(outcome.succeeded, 1);
    assert_eq!(outcome.failed, 0);

    // And the engine accepts a new batch once the first is done
    gate.add_permits(1);
    let again = engine.apply(plan).await.unwrap();
    assert_eq!(again.succeeded, 1);
}

#[tokio::test]
async fn search_matches_name_or_tag_case_insensitively() {
    let backend = Arc::new(MemoryBackend::with_data(
        vec![],
        vec![
            product("p1", &["nike", "shoes"]),
            product("p2", &["watches"]),
        ],
    ));
    let store = ProductStore::new(backend);
    store.list().await.unwrap();

    let by_tag = store.search("NIKE");
    assert_eq!(by_tag.len(), 1);
    assert_eq!(by_tag[0].id.as_deref(), Some("p1"));

    let by_name = store.search("product");
    assert_eq!(by_name.len(), 2);

    assert!(store.search("fossil").is_empty());
}
