// LMDB-backed product table
use anyhow::Result;
use heed::{Database, Env, EnvOpenOptions};
use std::path::Path;
use std::sync::Arc;

const DB_PRODUCTS: &str = "products";

pub struct LmdbStorage {
    env: Arc<Env>,
    products_db: Database<heed::types::Str, heed::types::Bytes>,
}

impl LmdbStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        std::fs::create_dir_all(&path)?;

        let env = Arc::new(
            unsafe {
                EnvOpenOptions::new()
                    .map_size(1024 * 1024 * 1024) // 1GB
                    .max_dbs(4)
                    .open(path)?
            }
        );

        let mut wtxn = env.write_txn()?;
        let products_db = env
            .create_database(&mut wtxn, Some(DB_PRODUCTS))?;
        wtxn.commit()?;

        Ok(Self {
            env,
            products_db,
        })
    }

    pub fn save_product(&self, product_id: &str, data: &[u8]) -> Result<()> {
        let mut wtxn = self.env.write_txn()?;
        self.products_db.put(&mut wtxn, product_id, data)?;
        wtxn.commit()?;
        Ok(())
    }

    pub fn get_product(&self, product_id: &str) -> Result<Option<Vec<u8>>> {
        let rtxn = self.env.read_txn()?;
        match self.products_db.get(&rtxn, product_id)? {
            Some(data) => Ok(Some(data.to_vec())),
            None => Ok(None),
        }
    }

    pub fn delete_product(&self, product_id: &str) -> Result<bool> {
        let mut wtxn = self.env.write_txn()?;
        let existed = self.products_db.delete(&mut wtxn, product_id)?;
        wtxn.commit()?;
        Ok(existed)
    }

    /// All stored values, in key order
    pub fn list_products(&self) -> Result<Vec<Vec<u8>>> {
        let rtxn = self.env.read_txn()?;
        let mut products = Vec::new();
        for result in self.products_db.iter(&rtxn)? {
            let (_, data) = result?;
            products.push(data.to_vec());
        }
        Ok(products)
    }

    pub fn count(&self) -> Result<u64> {
        let rtxn = self.env.read_txn()?;
        Ok(self.products_db.len(&rtxn)?)
    }
}
