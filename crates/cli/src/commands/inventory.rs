//! Catalog commands: list, add, update, remove, stats, scan.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rust_decimal::Decimal;
use thiserror::Error;

use gearstock_client::scan::{ScanEvent, ScanSession, prefill};
use gearstock_client::{
    CatalogCache, ClientConfig, HttpCatalogClient, InventorySynchronizer, SessionStore,
};
use gearstock_core::{Product, ProductDraft, ProductId, stats};

/// Errors building a product draft from CLI arguments.
#[derive(Debug, Error)]
pub enum DraftError {
    /// Image file could not be read.
    #[error("cannot read image {0}: {1}")]
    ImageRead(PathBuf, std::io::Error),

    /// Image extension is not JPG or PNG.
    #[error("unsupported image type {0}, expected .jpg or .png")]
    ImageType(PathBuf),
}

/// Build a synchronizer wired to the real remote service, restore the
/// session, and run the startup sequence (snapshot first, then fetch).
async fn synchronizer()
-> Result<InventorySynchronizer<HttpCatalogClient>, Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let sessions = SessionStore::new(&config)?;
    sessions.restore().await;

    let sync = InventorySynchronizer::new(
        HttpCatalogClient::new(&config)?,
        CatalogCache::new(&config),
        sessions,
    );
    sync.start().await;
    Ok(sync)
}

/// Assemble a draft from CLI arguments, encoding the image for transport.
pub fn draft(
    name: String,
    category: String,
    price: Decimal,
    quantity: u32,
    threshold: u32,
    image: Option<PathBuf>,
) -> Result<ProductDraft, DraftError> {
    let image_base64 = image.map(|path| encode_image(&path)).transpose()?;
    Ok(ProductDraft {
        name,
        category,
        price,
        quantity,
        threshold,
        image_base64,
    })
}

/// Read an image file into the `data:` URI form the service stores.
fn encode_image(path: &Path) -> Result<String, DraftError> {
    let mime = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => return Err(DraftError::ImageType(path.to_path_buf())),
    };

    let bytes =
        std::fs::read(path).map_err(|e| DraftError::ImageRead(path.to_path_buf(), e))?;
    Ok(format!("data:{mime};base64,{}", BASE64.encode(bytes)))
}

fn describe(product: &Product) -> String {
    let marker = if product.is_low_stock() { "  LOW" } else { "" };
    format!(
        "{}  {} [{}]  price {}  qty {}/{}{}",
        product.id, product.name, product.category, product.price, product.quantity,
        product.threshold, marker
    )
}

/// List the catalog, optionally only the low-stock subset.
pub async fn list(low_only: bool) -> Result<(), Box<dyn std::error::Error>> {
    let sync = synchronizer().await?;
    let catalog = sync.products().await;
    let status = sync.status().await;

    if let Some(error) = &status.last_error {
        tracing::warn!("Fetch failed ({error}); showing last known data");
    }
    if status.stale {
        tracing::warn!("Data may be stale");
    }

    let shown: Vec<&Product> = if low_only {
        stats::low_stock(&catalog)
    } else {
        catalog.iter().collect()
    };

    if shown.is_empty() {
        tracing::info!("No products found");
    }
    for product in shown {
        tracing::info!("{}", describe(product));
    }
    Ok(())
}

/// Create a product.
pub async fn add(draft: &ProductDraft) -> Result<(), Box<dyn std::error::Error>> {
    let sync = synchronizer().await?;
    let product = sync.add(draft).await?;
    tracing::info!("Created {}", describe(&product));
    Ok(())
}

/// Update a product.
pub async fn update(id: &str, draft: &ProductDraft) -> Result<(), Box<dyn std::error::Error>> {
    let sync = synchronizer().await?;
    let product = sync.update(&ProductId::new(id), draft).await?;
    tracing::info!("Updated {}", describe(&product));
    Ok(())
}

/// Delete a product.
pub async fn remove(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let sync = synchronizer().await?;
    let confirmation = sync.remove(&ProductId::new(id)).await?;
    tracing::info!(
        "{}",
        confirmation.message.unwrap_or_else(|| "Deleted".to_string())
    );
    Ok(())
}

/// Stock health summary over the current catalog.
pub async fn stats() -> Result<(), Box<dyn std::error::Error>> {
    let sync = synchronizer().await?;
    let catalog = sync.products().await;
    let status = sync.status().await;

    if status.stale {
        tracing::warn!("Data may be stale");
    }

    let low = stats::low_stock(&catalog);
    tracing::info!("Total products:        {}", catalog.len());
    tracing::info!("Items in stock:        {}", stats::total_units(&catalog));
    tracing::info!("Total inventory value: {}", stats::total_value(&catalog));
    tracing::info!("Low stock alerts:      {}", low.len());
    for product in low {
        tracing::info!("  {}", describe(product));
    }
    Ok(())
}

/// Run a scan session with the given decoded barcode and print the
/// prefilled draft the operator would confirm.
pub async fn scan(code: String) -> Result<(), Box<dyn std::error::Error>> {
    let (emitter, session) = ScanSession::channel();
    emitter.decoded(code);

    match session.wait().await {
        Some(ScanEvent::Decoded(text)) => {
            let draft = prefill(&text);
            tracing::info!("{}", serde_json::to_string_pretty(&draft)?);
        }
        Some(ScanEvent::Failed(description)) => {
            tracing::warn!("Scan failed: {description}");
        }
        None => tracing::info!("Scan dismissed"),
    }
    Ok(())
}
