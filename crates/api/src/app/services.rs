//! Storage wiring for the HTTP app.
//!
//! Handlers reach storage through `AppServices`, a bundle of tenant-scoped
//! stores (one per resource). The default build wires in-memory stores; with
//! the `postgres` feature the same trait objects are backed by the Postgres
//! document store with RLS context propagation.

use std::sync::Arc;

use bizgrid_business::BusinessProfile;
use bizgrid_catalog::{Package, Service};
use bizgrid_core::{
    BusinessId, DepartmentId, ExpenseId, ItemId, PackageId, PartyId, PurchaseOrderId, SaleId,
    ServiceId, StaffId, WalletId,
};
use bizgrid_finance::{Expense, Wallet};
use bizgrid_inventory::Item;
use bizgrid_parties::Party;
use bizgrid_pos::Sale;
use bizgrid_purchasing::PurchaseOrder;
use bizgrid_staff::{Department, StaffMember};
use bizgrid_store::{InMemoryScopedStore, ScopedStore};

type Store<K, V> = Arc<dyn ScopedStore<K, V>>;

pub struct AppServices {
    pub profiles: Store<BusinessId, BusinessProfile>,
    pub parties: Store<PartyId, Party>,
    pub departments: Store<DepartmentId, Department>,
    pub staff: Store<StaffId, StaffMember>,
    pub services: Store<ServiceId, Service>,
    pub packages: Store<PackageId, Package>,
    pub items: Store<ItemId, Item>,
    pub wallets: Store<WalletId, Wallet>,
    pub expenses: Store<ExpenseId, Expense>,
    pub purchase_orders: Store<PurchaseOrderId, PurchaseOrder>,
    pub sales: Store<SaleId, Sale>,
}

impl AppServices {
    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        Self {
            profiles: Arc::new(InMemoryScopedStore::new()),
            parties: Arc::new(InMemoryScopedStore::new()),
            departments: Arc::new(InMemoryScopedStore::new()),
            staff: Arc::new(InMemoryScopedStore::new()),
            services: Arc::new(InMemoryScopedStore::new()),
            packages: Arc::new(InMemoryScopedStore::new()),
            items: Arc::new(InMemoryScopedStore::new()),
            wallets: Arc::new(InMemoryScopedStore::new()),
            expenses: Arc::new(InMemoryScopedStore::new()),
            purchase_orders: Arc::new(InMemoryScopedStore::new()),
            sales: Arc::new(InMemoryScopedStore::new()),
        }
    }

    /// Postgres wiring; table names match `crates/store/schema.sql`.
    #[cfg(feature = "postgres")]
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        use bizgrid_store::PgScopedStore;

        let pool = Arc::new(pool);
        Self {
            profiles: Arc::new(PgScopedStore::new(pool.clone(), "business_profiles")),
            parties: Arc::new(PgScopedStore::new(pool.clone(), "parties")),
            departments: Arc::new(PgScopedStore::new(pool.clone(), "departments")),
            staff: Arc::new(PgScopedStore::new(pool.clone(), "staff_members")),
            services: Arc::new(PgScopedStore::new(pool.clone(), "services")),
            packages: Arc::new(PgScopedStore::new(pool.clone(), "packages")),
            items: Arc::new(PgScopedStore::new(pool.clone(), "inventory_items")),
            wallets: Arc::new(PgScopedStore::new(pool.clone(), "wallets")),
            expenses: Arc::new(PgScopedStore::new(pool.clone(), "expenses")),
            purchase_orders: Arc::new(PgScopedStore::new(pool.clone(), "purchase_orders")),
            sales: Arc::new(PgScopedStore::new(pool, "sales")),
        }
    }
}
