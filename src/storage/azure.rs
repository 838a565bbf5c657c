use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::{ContainerAccess, StorageConfig};

use super::{BlobStore, StorageError};

const API_VERSION: &str = "2021-08-06";

/// Fixed development account served by Azurite / the storage emulator,
/// selected with `UseDevelopmentStorage=true`. The key is public.
const DEV_ACCOUNT: &str = "devstoreaccount1";
const DEV_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
const DEV_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

/// Blob-service client speaking the Storage REST API directly, signing each
/// request with the account's SharedKey.
pub struct AzureBlobStore {
    client: reqwest::Client,
    account: StorageAccount,
    container: String,
    access: ContainerAccess,
}

#[derive(Debug, PartialEq, Eq)]
struct StorageAccount {
    name: String,
    key: Vec<u8>,
    blob_endpoint: String,
}

impl AzureBlobStore {
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let account = parse_connection_string(&config.connection_string)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            account,
            container: config.container.clone(),
            access: config.access,
        })
    }

    fn container_url(&self) -> String {
        format!("{}/{}", self.account.blob_endpoint, self.container)
    }

    fn object_url(&self, name: &str) -> String {
        format!("{}/{}/{}", self.account.blob_endpoint, self.container, name)
    }

    /// Date and version headers present on every request. Callers append
    /// operation-specific `x-ms-*` headers and sort before signing.
    fn base_headers(&self) -> Vec<(String, String)> {
        vec![
            (
                "x-ms-date".to_string(),
                Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
            ),
            ("x-ms-version".to_string(), API_VERSION.to_string()),
        ]
    }

    fn authorization(
        &self,
        verb: &str,
        url: &str,
        content_length: usize,
        content_type: &str,
        ms_headers: &[(String, String)],
        query: &[(&str, &str)],
    ) -> Result<String, StorageError> {
        let path = reqwest::Url::parse(url)
            .map_err(|e| StorageError::from(format!("Invalid storage URL: {e}")))?
            .path()
            .to_string();

        let to_sign = string_to_sign(
            verb,
            content_length,
            content_type,
            ms_headers,
            &self.account.name,
            &path,
            query,
        );
        let signature = hmac_base64(&self.account.key, &to_sign);

        Ok(format!("SharedKey {}:{signature}", self.account.name))
    }
}

#[async_trait::async_trait]
impl BlobStore for AzureBlobStore {
    async fn ensure_container(&self) -> Result<(), StorageError> {
        let url = format!("{}?restype=container", self.container_url());

        let mut headers = self.base_headers();
        if let Some(access) = public_access_header(self.access) {
            headers.push(("x-ms-blob-public-access".to_string(), access.to_string()));
        }
        headers.sort();

        let auth =
            self.authorization("PUT", &url, 0, "", &headers, &[("restype", "container")])?;

        let mut req = self.client.put(&url).header("Authorization", auth);
        for (name, value) in &headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();

        // 201: created now; 409: ContainerAlreadyExists. Both leave the
        // container in the state we need.
        if status == 201 || status == 409 {
            return Ok(());
        }
        Err(response_error("Container create failed", status, resp).await)
    }

    async fn put_object(
        &self,
        name: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let url = self.object_url(name);

        let mut headers = self.base_headers();
        headers.push(("x-ms-blob-type".to_string(), "BlockBlob".to_string()));
        headers.sort();

        let auth = self.authorization("PUT", &url, body.len(), content_type, &headers, &[])?;

        let mut req = self
            .client
            .put(&url)
            .header("Authorization", auth)
            .header("Content-Type", content_type);
        for (name, value) in &headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let resp = req.body(body).send().await?;
        let status = resp.status().as_u16();

        if status == 201 {
            return Ok(());
        }
        Err(response_error("Blob upload failed", status, resp).await)
    }

    async fn fetch_object(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let url = self.object_url(name);

        let mut headers = self.base_headers();
        headers.sort();

        let auth = self.authorization("GET", &url, 0, "", &headers, &[])?;

        let mut req = self.client.get(&url).header("Authorization", auth);
        for (name, value) in &headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();

        match status {
            200 => Ok(Some(resp.bytes().await?.to_vec())),
            404 => Ok(None),
            _ => Err(response_error("Blob download failed", status, resp).await),
        }
    }
}

async fn response_error(context: &str, status: u16, resp: reqwest::Response) -> StorageError {
    let body: String = resp
        .text()
        .await
        .unwrap_or_default()
        .chars()
        .take(1024)
        .collect();
    StorageError::from(format!("{context} (HTTP {status}): {body}"))
}

fn public_access_header(access: ContainerAccess) -> Option<&'static str> {
    match access {
        ContainerAccess::Private => None,
        ContainerAccess::Blob => Some("blob"),
        ContainerAccess::Container => Some("container"),
    }
}

/// SharedKey string-to-sign (2015-02-21 and later layout): twelve standard
/// header slots, the canonicalized `x-ms-*` headers, then the canonicalized
/// resource. Slots this service never sets stay empty; a zero content
/// length is also an empty slot.
fn string_to_sign(
    verb: &str,
    content_length: usize,
    content_type: &str,
    ms_headers: &[(String, String)],
    account: &str,
    path: &str,
    query: &[(&str, &str)],
) -> String {
    let content_length = if content_length == 0 {
        String::new()
    } else {
        content_length.to_string()
    };

    let mut canonical_headers = String::new();
    for (name, value) in ms_headers {
        canonical_headers.push_str(name);
        canonical_headers.push(':');
        canonical_headers.push_str(value);
        canonical_headers.push('\n');
    }

    let mut canonical_resource = format!("/{account}{path}");
    for (name, value) in query {
        canonical_resource.push('\n');
        canonical_resource.push_str(name);
        canonical_resource.push(':');
        canonical_resource.push_str(value);
    }

    format!(
        "{verb}\n\n\n{content_length}\n\n{content_type}\n\n\n\n\n\n\n{canonical_headers}{canonical_resource}"
    )
}

fn hmac_base64(key: &[u8], message: &str) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(key).expect("HMAC-SHA256 accepts keys of any length");
    mac.update(message.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

fn parse_connection_string(raw: &str) -> Result<StorageAccount, StorageError> {
    let mut name: Option<String> = None;
    let mut key: Option<String> = None;
    let mut protocol = "https".to_string();
    let mut suffix = "core.windows.net".to_string();
    let mut blob_endpoint: Option<String> = None;
    let mut use_dev = false;

    for segment in raw.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        // Split on the first '=' only: account keys are base64 and end in
        // padding '=' characters.
        let Some((k, v)) = segment.split_once('=') else {
            return Err(StorageError::from(format!(
                "Malformed connection string segment: {segment}"
            )));
        };
        match k {
            "AccountName" => name = Some(v.to_string()),
            "AccountKey" => key = Some(v.to_string()),
            "DefaultEndpointsProtocol" => protocol = v.to_string(),
            "EndpointSuffix" => suffix = v.to_string(),
            "BlobEndpoint" => blob_endpoint = Some(v.trim_end_matches('/').to_string()),
            "UseDevelopmentStorage" => use_dev = v.eq_ignore_ascii_case("true"),
            _ => {}
        }
    }

    if use_dev {
        name.get_or_insert_with(|| DEV_ACCOUNT.to_string());
        key.get_or_insert_with(|| DEV_ACCOUNT_KEY.to_string());
        blob_endpoint.get_or_insert_with(|| DEV_BLOB_ENDPOINT.to_string());
    }

    let name = name.ok_or_else(|| StorageError::from("Connection string is missing AccountName"))?;
    let key = key.ok_or_else(|| StorageError::from("Connection string is missing AccountKey"))?;
    let key = BASE64
        .decode(key.as_bytes())
        .map_err(|e| StorageError::from(format!("AccountKey is not valid base64: {e}")))?;
    let blob_endpoint =
        blob_endpoint.unwrap_or_else(|| format!("{protocol}://{name}.blob.{suffix}"));

    Ok(StorageAccount {
        name,
        key,
        blob_endpoint,
    })
}
