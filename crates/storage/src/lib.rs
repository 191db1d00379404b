use anyhow::{bail, Result};
use std::{
    collections::HashSet,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use tracing::debug;

use shared::domain::{NewUser, Product, ProductId, User, UserId};

/// Handle to both in-memory stores. Cloning shares the same underlying data.
#[derive(Clone)]
pub struct Storage {
    catalog: Arc<Catalog>,
    registry: Arc<Registry>,
}

/// Fixed product list. Exposes no mutating methods.
#[derive(Debug)]
pub struct Catalog {
    products: Vec<Product>,
}

/// Append-only user list. The next id is computed under the write lock so
/// concurrent registrations never share an id.
#[derive(Debug, Default)]
pub struct Registry {
    users: RwLock<Vec<User>>,
}

pub fn seed_products() -> Vec<Product> {
    vec![
        Product::new(1, "Portátil", 899.99, "Tecnología"),
        Product::new(2, "Mesa", 199.50, "Muebles"),
        Product::new(3, "Libro", 15.99, "Educación"),
    ]
}

impl Storage {
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(Catalog {
                products: seed_products(),
            }),
            registry: Arc::new(Registry::default()),
        }
    }

    pub fn with_catalog(products: Vec<Product>) -> Result<Self> {
        Ok(Self {
            catalog: Arc::new(Catalog::new(products)?),
            registry: Arc::new(Registry::default()),
        })
    }

    pub fn health_check(&self) -> Result<()> {
        if self.registry.users.is_poisoned() {
            bail!("user registry lock poisoned by a panicked writer");
        }
        Ok(())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn list_products(&self) -> &[Product] {
        self.catalog.products()
    }

    pub fn find_product(&self, product_id: ProductId) -> Option<&Product> {
        self.catalog.find(product_id)
    }

    pub fn list_users(&self) -> Vec<User> {
        self.registry.snapshot()
    }

    pub fn user_count(&self) -> usize {
        self.registry.len()
    }

    pub fn create_user(&self, new_user: NewUser) -> User {
        self.registry.append(new_user)
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                bail!("duplicate product id {} in catalog seed", product.id);
            }
        }
        Ok(Self { products })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    /// Distinct categories, sorted for stable rendering.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .products
            .iter()
            .map(|p| p.category.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        categories.sort();
        categories
    }
}

impl Registry {
    fn read(&self) -> RwLockReadGuard<'_, Vec<User>> {
        self.users
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<User>> {
        self.users
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn snapshot(&self) -> Vec<User> {
        self.read().clone()
    }

    pub fn append(&self, new_user: NewUser) -> User {
        let mut users = self.write();
        // Ids are positional; valid only because nothing is ever removed.
        let user_id = UserId(users.len() as i64 + 1);
        let user = User::from_new(user_id, new_user);
        users.push(user.clone());
        debug!(user_id = user_id.0, total = users.len(), "user appended to registry");
        user
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
