//! Typed printer API for one shop

use async_trait::async_trait;
use shared::models::{
    DisplayPrinter, ManualStatus, ManualStatusRequest, OverridePatch, PrinterRecord,
    StatusChange, SyncTicket,
};

use crate::ClientResult;
use crate::config::ClientConfig;
use crate::http::{HttpClient, NetworkHttpClient};

/// Printer operations the dashboard depends on
#[async_trait]
pub trait PrinterApi: Send + Sync {
    async fn list_printers(&self) -> ClientResult<Vec<PrinterRecord>>;
    async fn get_printer(&self, printer_id: &str) -> ClientResult<PrinterRecord>;
    async fn patch_override(
        &self,
        printer_id: &str,
        patch: &OverridePatch,
    ) -> ClientResult<PrinterRecord>;
    async fn set_manual_status(
        &self,
        printer_id: &str,
        status: ManualStatus,
    ) -> ClientResult<StatusChange>;
    async fn force_sync(&self, printer_id: &str) -> ClientResult<SyncTicket>;
}

/// REST implementation of [`PrinterApi`]
#[derive(Debug, Clone)]
pub struct PrinterClient<C = NetworkHttpClient> {
    http: C,
    shop_id: String,
}

impl PrinterClient<NetworkHttpClient> {
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(NetworkHttpClient::new(config)?, &config.shop_id))
    }
}

impl<C: HttpClient> PrinterClient<C> {
    pub fn new(http: C, shop_id: impl Into<String>) -> Self {
        Self {
            http,
            shop_id: shop_id.into(),
        }
    }

    pub fn shop_id(&self) -> &str {
        &self.shop_id
    }

    fn printers_path(&self) -> String {
        format!("/shops/{}/printers", self.shop_id)
    }

    fn printer_path(&self, printer_id: &str) -> String {
        format!("{}/{}", self.printers_path(), printer_id)
    }

    /// Server-side resolved view
    pub async fn list_display(&self) -> ClientResult<Vec<DisplayPrinter>> {
        let path = format!("/shops/{}/printer-display", self.shop_id);
        self.http.get(&path).await
    }

    pub async fn remove_printer(&self, printer_id: &str) -> ClientResult<PrinterRecord> {
        self.http.delete(&self.printer_path(printer_id)).await
    }
}

#[async_trait]
impl<C: HttpClient> PrinterApi for PrinterClient<C> {
    async fn list_printers(&self) -> ClientResult<Vec<PrinterRecord>> {
        self.http.get(&self.printers_path()).await
    }

    async fn get_printer(&self, printer_id: &str) -> ClientResult<PrinterRecord> {
        self.http.get(&self.printer_path(printer_id)).await
    }

    async fn patch_override(
        &self,
        printer_id: &str,
        patch: &OverridePatch,
    ) -> ClientResult<PrinterRecord> {
        self.http.patch(&self.printer_path(printer_id), patch).await
    }

    async fn set_manual_status(
        &self,
        printer_id: &str,
        status: ManualStatus,
    ) -> ClientResult<StatusChange> {
        let path = format!("{}/manualStatus", self.printer_path(printer_id));
        self.http
            .patch(&path, &ManualStatusRequest::new(status))
            .await
    }

    async fn force_sync(&self, printer_id: &str) -> ClientResult<SyncTicket> {
        let path = format!("{}/sync", self.printer_path(printer_id));
        self.http.post_empty(&path).await
    }
}
