//! Barcode scan support.
//!
//! The scanner widget is an external collaborator that hands us exactly one
//! decoded string or one failure per scan session. That contract is modeled
//! as a one-shot channel: the emitter side fires once, and dropping it
//! (scan UI dismissed) closes the session. The decoded string's only use is
//! as a lookup key into a static reference table of known part barcodes,
//! falling back to a placeholder draft carrying the scanned code.

use rust_decimal::Decimal;
use tokio::sync::oneshot;

use gearstock_core::ProductDraft;

/// Default threshold for drafts prefilled from a scan.
const DEFAULT_THRESHOLD: u32 = 5;

/// Known part barcodes. A real deployment would source this from the
/// service; the set mirrors the parts the business stocks most.
const REFERENCE_PARTS: &[ReferencePart] = &[
    ReferencePart {
        code: "8901234567890",
        name: "Tata Nexon Front Bumper",
        category: "Body Parts",
        price: 4500,
    },
    ReferencePart {
        code: "8909876543210",
        name: "Hyundai Creta Headlight Assembly",
        category: "Electrical",
        price: 8500,
    },
    ReferencePart {
        code: "8905555555555",
        name: "Mahindra XUV700 Brake Pads",
        category: "Brakes",
        price: 2200,
    },
];

struct ReferencePart {
    code: &'static str,
    name: &'static str,
    category: &'static str,
    price: u32,
}

/// Outcome of a scan session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// The widget decoded a barcode.
    Decoded(String),
    /// The widget gave up; carries its error description.
    Failed(String),
}

/// Sending half handed to the scanner integration. Fires exactly once.
pub struct ScanEmitter {
    tx: oneshot::Sender<ScanEvent>,
}

impl ScanEmitter {
    /// Report a decoded barcode. Consumes the emitter.
    pub fn decoded(self, text: impl Into<String>) {
        let _ = self.tx.send(ScanEvent::Decoded(text.into()));
    }

    /// Report a scan failure. Consumes the emitter.
    pub fn failed(self, description: impl Into<String>) {
        let _ = self.tx.send(ScanEvent::Failed(description.into()));
    }
}

/// Receiving half consumed by the draft-prefill logic.
pub struct ScanSession {
    rx: oneshot::Receiver<ScanEvent>,
}

impl ScanSession {
    /// Open a scan session. Give the emitter to the scanner; await the
    /// session.
    #[must_use]
    pub fn channel() -> (ScanEmitter, Self) {
        let (tx, rx) = oneshot::channel();
        (ScanEmitter { tx }, Self { rx })
    }

    /// Wait for the scan outcome. `None` means the emitter was dropped
    /// without firing - the scan UI was dismissed.
    pub async fn wait(self) -> Option<ScanEvent> {
        self.rx.await.ok()
    }
}

/// Build a product draft from a decoded barcode.
///
/// Known codes prefill from the reference table; unknown codes produce a
/// placeholder draft with the scanned code embedded in its name. Quantity
/// defaults to 1 so the operator only has to confirm or adjust it.
#[must_use]
pub fn prefill(code: &str) -> ProductDraft {
    REFERENCE_PARTS
        .iter()
        .find(|part| part.code == code)
        .map_or_else(
            || ProductDraft {
                name: format!("Unknown Product ({code})"),
                category: "Spares".to_string(),
                price: Decimal::ZERO,
                quantity: 1,
                threshold: DEFAULT_THRESHOLD,
                image_base64: None,
            },
            |part| ProductDraft {
                name: part.name.to_string(),
                category: part.category.to_string(),
                price: Decimal::from(part.price),
                quantity: 1,
                threshold: DEFAULT_THRESHOLD,
                image_base64: None,
            },
        )
}
