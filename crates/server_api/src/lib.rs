use shared::{
    domain::{NewUser, Product, ProductId, User},
    protocol::{
        ContactForm, ContactReceipt, ProductListing, ProductLookup, RegistrationForm,
        RegistrationReceipt, SearchForm, SearchOutcome,
    },
};
use storage::Storage;
use tracing::{debug, info};

#[derive(Clone, Default)]
pub struct ApiContext {
    pub storage: Storage,
}

impl ApiContext {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }
}

pub fn list_products(ctx: &ApiContext, category: Option<&str>) -> ProductListing {
    let catalog = ctx.storage.catalog();
    let selected = category.filter(|c| !c.is_empty());
    let products: Vec<Product> = match selected {
        Some(category) => catalog
            .products()
            .iter()
            .filter(|p| p.in_category(category))
            .cloned()
            .collect(),
        None => catalog.products().to_vec(),
    };
    debug!(category = ?selected, matched = products.len(), "listing products");

    ProductListing {
        products,
        categories: catalog.categories(),
        selected_category: selected.map(str::to_string),
    }
}

pub fn find_product(ctx: &ApiContext, product_id: ProductId) -> ProductLookup {
    match ctx.storage.find_product(product_id) {
        Some(product) => ProductLookup::Found {
            product: product.clone(),
        },
        None => {
            debug!(product_id = product_id.0, "product not found");
            ProductLookup::NotFound {
                message: format!("Producto con ID {product_id} no encontrado"),
            }
        }
    }
}

pub fn search_products(ctx: &ApiContext, form: SearchForm) -> SearchOutcome {
    let results: Vec<Product> = ctx
        .storage
        .list_products()
        .iter()
        .filter(|p| p.name_contains(&form.term))
        .filter(|p| form.min_price.map_or(true, |min| p.price >= min))
        .filter(|p| form.max_price.map_or(true, |max| p.price <= max))
        .cloned()
        .collect();
    debug!(term = %form.term, matched = results.len(), "searched products");

    SearchOutcome {
        results,
        term: form.term,
        min_price: form.min_price,
        max_price: form.max_price,
    }
}

pub fn register_user(ctx: &ApiContext, form: RegistrationForm) -> RegistrationReceipt {
    let user = ctx.storage.create_user(NewUser::from(form));
    info!(user_id = user.id.0, interests = user.interests.len(), "user registered");
    RegistrationReceipt { user }
}

pub fn list_users(ctx: &ApiContext) -> Vec<User> {
    ctx.storage.list_users()
}

/// Echoes the submission back. Nothing is stored.
pub fn submit_contact(form: ContactForm) -> ContactReceipt {
    info!(email = %form.email, "contact message received");
    ContactReceipt {
        name: form.name,
        email: form.email,
        message: form.message,
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
