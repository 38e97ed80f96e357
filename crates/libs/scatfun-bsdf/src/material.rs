use crate::table::FourierBsdfTable;
use std::{path::Path, sync::Arc};

/// Material backed by a tabulated Fourier BSDF.
///
/// The material owns the table it requested. If loading fails the error is
/// logged and the material becomes inert: it holds no table and contributes
/// no scattering lobe. `B` is the handle of the optional bump map applied by
/// the host renderer before evaluating the table.
#[derive(Debug, Clone)]
pub struct FourierMaterial<B = ()> {
    table: Option<Arc<FourierBsdfTable>>,
    bump_map: Option<B>,
}

impl<B> FourierMaterial<B> {
    /// Creates the material by loading the table stored at `filepath`.
    pub fn new<P: AsRef<Path>>(filepath: P, bump_map: Option<B>) -> Self {
        let table = match FourierBsdfTable::load(filepath.as_ref()) {
            Ok(table) => Some(Arc::new(table)),
            Err(err) => {
                log::error!("{}; the material will not scatter light", err);
                None
            },
        };
        Self { table, bump_map }
    }

    /// Creates the material from an already loaded table.
    pub fn with_table(table: Arc<FourierBsdfTable>, bump_map: Option<B>) -> Self {
        Self {
            table: Some(table),
            bump_map,
        }
    }

    /// The table, unless loading it failed.
    pub fn table(&self) -> Option<&FourierBsdfTable> { self.table.as_deref() }

    /// Shared handle to the table, for evaluation on other threads.
    pub fn shared_table(&self) -> Option<Arc<FourierBsdfTable>> { self.table.clone() }

    /// The bump map, if any.
    pub fn bump_map(&self) -> Option<&B> { self.bump_map.as_ref() }

    /// Returns true if the material has no table and scatters no light.
    pub fn is_inert(&self) -> bool { self.table.is_none() }
}
