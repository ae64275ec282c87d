use super::*;

pub(super) struct AppState {
    pub(super) user: String,
    pub(super) password: String,
    pub(super) validation_delay: Duration,

    // blake3 hashes of live session tokens.
    pub(super) sessions: RwLock<HashSet<String>>,

    pub(super) db: RwLock<Db>,
}

impl AppState {
    pub(super) fn new(user: String, password: String, validation_delay: Duration) -> Self {
        Self {
            user,
            password,
            validation_delay,
            sessions: RwLock::new(HashSet::new()),
            db: RwLock::new(Db::seeded()),
        }
    }
}

/// In-memory collections, in insertion order.
#[derive(Default)]
pub(super) struct Db {
    pub(super) tfstates: Vec<TfState>,
    pub(super) features: Vec<Feature>,
    pub(super) logs: Vec<LogEntry>,
    pub(super) foreign_resources: Vec<ForeignResource>,
}

impl Db {
    /// Foreign resources are discovered server-side and have no create endpoint.
    fn seeded() -> Self {
        let now = now_unix();
        let seed = |n: i64, resource_type: &str, resource_id: &str, is_exception: bool| {
            ForeignResource {
                id: RecordId::new(format!("fr{:02}", n)),
                timestamp: now - n * 3600,
                date_time: String::new(),
                resource_id: resource_id.to_string(),
                resource_type: resource_type.to_string(),
                is_exception,
            }
        };
        Self {
            foreign_resources: vec![
                seed(1, "aws_s3_bucket", "legacy-artifacts", false),
                seed(2, "aws_iam_role", "ci-deployer", true),
            ],
            ..Self::default()
        }
    }
}

/// Hash of the bearer token that authenticated the request.
#[derive(Clone, Debug)]
pub(super) struct SessionToken(pub(super) String);

#[derive(Debug, serde::Deserialize)]
pub(super) struct TfStateInput {
    #[serde(default)]
    pub(super) account: String,
    pub(super) bucket: String,
    pub(super) path: String,
    #[serde(default)]
    pub(super) tags: Vec<String>,
}

impl TfStateInput {
    pub(super) fn validate(&self) -> anyhow::Result<()> {
        if self.bucket.trim().is_empty() || self.path.trim().is_empty() {
            anyhow::bail!("bucket and path are required");
        }
        Ok(())
    }
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct FeatureInput {
    pub(super) name: String,
    #[serde(default)]
    pub(super) source: String,
    #[serde(default)]
    pub(super) tags: Vec<String>,
    #[serde(default)]
    pub(super) disabled: bool,
}

impl FeatureInput {
    pub(super) fn validate(&self) -> anyhow::Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            anyhow::bail!("name is required");
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            anyhow::bail!("name may only contain letters, digits, '-' and '_'");
        }
        Ok(())
    }
}

pub(super) fn random_hex(len: usize) -> anyhow::Result<String> {
    let mut bytes = vec![0u8; len];
    getrandom::getrandom(&mut bytes).map_err(|e| anyhow::anyhow!("getrandom: {:?}", e))?;
    let mut out = String::with_capacity(len * 2);
    for b in &bytes {
        out.push_str(&format!("{:02x}", b));
    }
    Ok(out)
}

pub(super) fn new_record_id() -> Result<RecordId, Response> {
    random_hex(12).map(RecordId::new).map_err(internal_error)
}

pub(super) fn now_unix() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

pub(super) fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| now_unix().to_string())
}
