//! DNS record queries.
//!
//! Lookups go through a [`RecordResolver`] handle owned by the caller. One
//! lookup runs per requested record type, a few at a time, each with its own
//! timeout. A failed lookup becomes a placeholder record describing the
//! failure, so a query always answers every requested type.

use domain::base::iana::Rcode;
use domain::base::name::Name;
use domain::base::Rtype;
use domain::rdata::{AllRecordData, Mx, Soa};
use domain::resolv::StubResolver;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::io;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Ns,
    Txt,
    Soa,
    Ptr,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Txt => "TXT",
            RecordType::Soa => "SOA",
            RecordType::Ptr => "PTR",
        };
        f.write_str(name)
    }
}

/// One answer record.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub value: String,
    pub ttl: u32,
}

/// All answers for one requested type.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub records: Vec<DnsRecord>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DnsError {
    #[error("domain {0} does not exist")]
    NxDomain(String),
    #[error("no {record_type} records for {domain}")]
    NoAnswer {
        domain: String,
        record_type: RecordType,
    },
    #[error("query timed out")]
    Timeout,
    /// For resolvers that only answer some record types.
    #[error("{0} lookups are not supported by this resolver")]
    Unsupported(RecordType),
    #[error("lookup failed: {0}")]
    Lookup(String),
}

/// Source of DNS answers.
pub trait RecordResolver: Send + Sync {
    fn lookup(
        &self,
        domain: &str,
        record_type: RecordType,
    ) -> impl Future<Output = Result<Vec<DnsRecord>, DnsError>> + Send;
}

/// Resolver using the system's name servers (`/etc/resolv.conf`).
///
/// Every record type is queried as is; answers of other types in the
/// response (a CNAME ahead of the A records, say) are left out.
#[derive(Debug, Clone)]
pub struct SystemResolver {
    stub: Arc<StubResolver>,
}

impl SystemResolver {
    pub fn new() -> Self {
        SystemResolver {
            stub: Arc::new(StubResolver::new()),
        }
    }
}

impl Default for SystemResolver {
    fn default() -> Self {
        SystemResolver::new()
    }
}

impl RecordType {
    fn rtype(self) -> Rtype {
        match self {
            RecordType::A => Rtype::A,
            RecordType::Aaaa => Rtype::AAAA,
            RecordType::Cname => Rtype::CNAME,
            RecordType::Mx => Rtype::MX,
            RecordType::Ns => Rtype::NS,
            RecordType::Txt => Rtype::TXT,
            RecordType::Soa => Rtype::SOA,
            RecordType::Ptr => Rtype::PTR,
        }
    }
}

/// Fully qualified form of a domain name, with the trailing dot.
fn fqdn<N: fmt::Display>(name: &N) -> String {
    let name = name.to_string();
    if name.ends_with('.') {
        name
    } else {
        format!("{name}.")
    }
}

/// `preference exchange.`
pub fn mx_value<N: fmt::Display>(mx: &Mx<N>) -> String {
    format!("{} {}", mx.preference(), fqdn(mx.exchange()))
}

/// `mname. rname. serial`
pub fn soa_value<N: fmt::Display>(soa: &Soa<N>) -> String {
    format!(
        "{} {} {}",
        fqdn(soa.mname()),
        fqdn(soa.rname()),
        soa.serial()
    )
}

fn lookup_error(e: io::Error) -> DnsError {
    match e.kind() {
        io::ErrorKind::TimedOut => DnsError::Timeout,
        _ => DnsError::Lookup(e.to_string()),
    }
}

impl RecordResolver for SystemResolver {
    fn lookup(
        &self,
        domain: &str,
        record_type: RecordType,
    ) -> impl Future<Output = Result<Vec<DnsRecord>, DnsError>> + Send {
        let domain = domain.to_string();
        let stub = self.stub.clone();
        async move {
            let qname = Name::<Vec<u8>>::from_str(&domain).map_err(|e| {
                DnsError::Lookup(format!("invalid domain name {domain}: {e}"))
            })?;
            let rtype = record_type.rtype();
            let answer = stub.query((qname, rtype)).await.map_err(lookup_error)?;
            if answer.header().rcode() == Rcode::NXDOMAIN {
                return Err(DnsError::NxDomain(domain));
            }

            let section = answer
                .answer()
                .map_err(|e| DnsError::Lookup(format!("malformed answer: {e}")))?;
            let mut records = Vec::new();
            for record in section.limit_to::<AllRecordData<_, _>>() {
                let record =
                    record.map_err(|e| DnsError::Lookup(format!("malformed record: {e}")))?;
                if record.rtype() != rtype {
                    continue;
                }
                let value = match record.data() {
                    AllRecordData::Mx(mx) => mx_value(&mx),
                    AllRecordData::Soa(soa) => soa_value(&soa),
                    other => other.to_string(),
                };
                records.push(DnsRecord {
                    name: domain.clone(),
                    record_type,
                    value,
                    ttl: record.ttl().as_secs(),
                });
            }
            if records.is_empty() {
                return Err(DnsError::NoAnswer {
                    domain,
                    record_type,
                });
            }
            Ok(records)
        }
    }
}

fn placeholder(domain: &str, record_type: RecordType, err: &DnsError) -> RecordSet {
    RecordSet {
        record_type,
        records: vec![DnsRecord {
            name: domain.to_string(),
            record_type,
            value: err.to_string(),
            ttl: 0,
        }],
    }
}

async fn query_single<R: RecordResolver>(
    resolver: &R,
    domain: &str,
    record_type: RecordType,
    timeout: Duration,
) -> RecordSet {
    log::info!("query {domain} {record_type}");
    let result = match tokio::time::timeout(timeout, resolver.lookup(domain, record_type)).await {
        Ok(result) => result,
        Err(_) => Err(DnsError::Timeout),
    };
    match result {
        Ok(records) => {
            log::info!("got {} {record_type} records for {domain}", records.len());
            RecordSet {
                record_type,
                records,
            }
        }
        Err(e) => {
            log::warn!("{record_type} lookup for {domain}: {e}");
            placeholder(domain, record_type, &e)
        }
    }
}

/// Query every type in `record_types` for `domain`.
///
/// At most `workers` lookups run at once. Results follow the order of
/// `record_types`; repeated types are queried once.
pub async fn query_records<R: RecordResolver>(
    resolver: &R,
    domain: &str,
    record_types: &[RecordType],
    workers: usize,
    timeout: Duration,
) -> Vec<RecordSet> {
    let domain = domain.trim();
    let types: Vec<RecordType> = record_types.iter().copied().unique().collect();
    log::info!("query {domain} for {}", types.iter().join(","));

    let mut results: Vec<(usize, RecordSet)> = stream::iter(types.into_iter().enumerate())
        .map(|(i, record_type)| async move {
            (i, query_single(resolver, domain, record_type, timeout).await)
        })
        .buffer_unordered(workers.max(1))
        .collect()
        .await;

    results.sort_by_key(|(i, _)| *i);
    log::info!("query {domain} done, {} record sets", results.len());
    results.into_iter().map(|(_, set)| set).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::base::{Serial, Ttl};

    struct ScriptedResolver;

    impl RecordResolver for ScriptedResolver {
        fn lookup(
            &self,
            domain: &str,
            record_type: RecordType,
        ) -> impl Future<Output = Result<Vec<DnsRecord>, DnsError>> + Send {
            let domain = domain.to_string();
            async move {
                let record = |value: &str| DnsRecord {
                    name: domain.clone(),
                    record_type,
                    value: value.to_string(),
                    ttl: 300,
                };
                match record_type {
                    RecordType::A => {
                        // Finish last so ordering has to be restored
                        tokio::time::sleep(Duration::from_millis(30)).await;
                        Ok(vec![record("93.184.216.34")])
                    }
                    RecordType::Mx => Ok(vec![record("10 mail.example.com.")]),
                    RecordType::Txt => {
                        tokio::time::sleep(Duration::from_secs(10)).await;
                        Ok(vec![])
                    }
                    RecordType::Ns => Err(DnsError::NxDomain(domain.clone())),
                    other => Err(DnsError::NoAnswer {
                        domain: domain.clone(),
                        record_type: other,
                    }),
                }
            }
        }
    }

    #[tokio::test]
    async fn test_query_keeps_request_order() {
        let sets = query_records(
            &ScriptedResolver,
            " example.com ",
            &[RecordType::A, RecordType::Mx, RecordType::A],
            3,
            Duration::from_secs(1),
        )
        .await;
        let types: Vec<RecordType> = sets.iter().map(|s| s.record_type).collect();
        assert_eq!(types, vec![RecordType::A, RecordType::Mx]);
        assert_eq!(sets[0].records[0].value, "93.184.216.34");
        assert_eq!(sets[0].records[0].name, "example.com");
        assert_eq!(sets[1].records[0].ttl, 300);
    }

    #[tokio::test]
    async fn test_failures_become_placeholders() {
        let sets = query_records(
            &ScriptedResolver,
            "example.com",
            &[RecordType::Ns, RecordType::Txt, RecordType::Soa],
            1,
            Duration::from_millis(50),
        )
        .await;
        assert_eq!(sets.len(), 3);
        assert_eq!(sets[0].records[0].value, "domain example.com does not exist");
        assert_eq!(sets[1].records[0].value, "query timed out");
        assert_eq!(sets[2].records[0].value, "no SOA records for example.com");
        assert!(sets.iter().all(|s| s.records[0].ttl == 0));
    }

    #[test]
    fn test_mx_and_soa_values() {
        let name = |text: &str| Name::<Vec<u8>>::from_str(text).unwrap();
        let mx = Mx::new(10, name("mail.example.com"));
        assert_eq!(mx_value(&mx), "10 mail.example.com.");

        let soa = Soa::new(
            name("ns1.example.com"),
            name("hostmaster.example.com"),
            Serial::from(2024010101u32),
            Ttl::from_secs(7200),
            Ttl::from_secs(3600),
            Ttl::from_secs(1209600),
            Ttl::from_secs(300),
        );
        assert_eq!(
            soa_value(&soa),
            "ns1.example.com. hostmaster.example.com. 2024010101"
        );
    }

    #[test]
    fn test_record_type_mapping() {
        assert_eq!(RecordType::Aaaa.rtype(), Rtype::AAAA);
        assert_eq!(RecordType::Ptr.rtype(), Rtype::PTR);
        assert_eq!(RecordType::Mx.rtype().to_string(), RecordType::Mx.to_string());
    }

    #[tokio::test]
    async fn test_system_resolver_rejects_bad_name() {
        // A label longer than 63 octets never reaches the network
        let domain = format!("{}.example.com", "a".repeat(64));
        assert!(matches!(
            SystemResolver::new().lookup(&domain, RecordType::Mx).await,
            Err(DnsError::Lookup(_))
        ));
    }

    #[test]
    fn test_record_json() {
        let record = DnsRecord {
            name: "example.com".to_string(),
            record_type: RecordType::Aaaa,
            value: "::1".to_string(),
            ttl: 60,
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({"name": "example.com", "type": "AAAA", "value": "::1", "ttl": 60})
        );
        let t: RecordType = serde_json::from_str("\"CNAME\"").unwrap();
        assert_eq!(t, RecordType::Cname);
    }
}
