//! Integration tests for the pipeline
//!
//! Every network capability is replaced by an in-memory fake; the LLM is the
//! scripted MockProvider.

use async_trait::async_trait;
use dossier_domain::traits::{
    BoxError, FaceSearch, HostedProfile, NetworkIdentity, PageTextProvider, ProfessionalNetworkLookup,
    SearchHit, SourceHostingLookup, WebSearch,
};
use dossier_domain::{CandidateMatch, EvidenceOrigin, Stage};
use dossier_llm::MockProvider;
use dossier_pipeline::{
    Collaborators, Pipeline, PipelineConfig, PipelineError, PipelineEvent, ProgressSink, RunInput,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, UnboundedReceiver};

const PROFILE_JSON: &str = r#"{
    "name": "Jane Doe",
    "profession": "Software Engineer",
    "workplace": "Acme",
    "email": "",
    "phone": "",
    "fun_facts": ["Writes compilers in Rust", "Speaks at conferences", "Lives in Seattle"]
}"#;

// ----------------------------------------------------------------------------
// Fakes
// ----------------------------------------------------------------------------

#[derive(Default)]
struct FakePages {
    texts: HashMap<String, String>,
    fetched: Mutex<Vec<String>>,
}

impl FakePages {
    fn with(pages: &[(&str, &str)]) -> Self {
        Self {
            texts: pages
                .iter()
                .map(|(url, text)| (url.to_string(), text.to_string()))
                .collect(),
            fetched: Mutex::new(Vec::new()),
        }
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageTextProvider for FakePages {
    async fn fetch_text(&self, url: &str) -> Option<String> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.texts.get(url).cloned()
    }
}

#[derive(Default)]
struct FakeHosting {
    profile: Option<HostedProfile>,
    readme: String,
}

#[async_trait]
impl SourceHostingLookup for FakeHosting {
    async fn lookup_profile(&self, _url: &str) -> Option<HostedProfile> {
        self.profile.clone()
    }

    async fn fetch_readme(&self, _profile: &HostedProfile) -> String {
        self.readme.clone()
    }
}

#[derive(Default)]
struct FakeNetwork {
    identity: NetworkIdentity,
}

#[async_trait]
impl ProfessionalNetworkLookup for FakeNetwork {
    async fn lookup_identity(&self, _url: &str) -> NetworkIdentity {
        self.identity.clone()
    }
}

#[derive(Default)]
struct FakeWeb {
    hits: Vec<SearchHit>,
    queries: Mutex<Vec<(String, usize)>>,
}

#[async_trait]
impl WebSearch for FakeWeb {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, BoxError> {
        self.queries.lock().unwrap().push((query.to_string(), max_results));
        Ok(self.hits.clone())
    }
}

struct FakeFaceSearch {
    result: Result<Vec<CandidateMatch>, String>,
}

#[async_trait]
impl FaceSearch for FakeFaceSearch {
    async fn search(&self, _image: &[u8]) -> Result<Vec<CandidateMatch>, BoxError> {
        self.result.clone().map_err(Into::into)
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

fn test_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.escalation.search_delay_ms = 0;
    config.filter.max_workers = Some(2);
    config
}

fn collaborators(pages: Arc<FakePages>) -> Collaborators {
    Collaborators {
        pages,
        hosting: Arc::new(FakeHosting::default()),
        network: Arc::new(FakeNetwork::default()),
        web: Arc::new(FakeWeb::default()),
    }
}

fn pipeline(collaborators: Collaborators, llm: &MockProvider) -> Pipeline<MockProvider> {
    Pipeline::new(collaborators, Arc::new(llm.clone()), test_config()).unwrap()
}

fn drain(rx: &mut UnboundedReceiver<PipelineEvent>) -> Vec<PipelineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn progress(events: &[PipelineEvent]) -> Vec<(Stage, String)> {
    events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Progress(p) => Some((p.stage, p.message.clone())),
            _ => None,
        })
        .collect()
}

/// Five candidates whose two best scores form the core; only `c` shares
/// enough words with the core pages
fn scenario_candidates() -> Vec<CandidateMatch> {
    vec![
        CandidateMatch::new(40, "https://c.example/talk"),
        CandidateMatch::new(98, "https://a.example/about"),
        CandidateMatch::new(37, "https://e.example/gone"),
        CandidateMatch::new(95, "https://b.example/bio"),
        CandidateMatch::new(38, "https://d.example/weather"),
    ]
}

fn scenario_pages() -> FakePages {
    FakePages::with(&[
        (
            "https://a.example/about",
            "Jane Doe is a software engineer at Acme in Seattle. Jane writes compilers in Rust.",
        ),
        (
            "https://b.example/bio",
            "Jane Doe, Acme software engineer, speaks about Rust compilers around Seattle.",
        ),
        (
            "https://c.example/talk",
            "Seattle engineer Jane Doe from Acme presented her Rust compilers work.",
        ),
        (
            "https://d.example/weather",
            "Weather forecast for Portland tomorrow: rain and wind.",
        ),
    ])
}

// ----------------------------------------------------------------------------
// Scenarios
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_core_and_single_match_without_profile_urls() {
    let pages = Arc::new(scenario_pages());
    let llm = MockProvider::new(PROFILE_JSON);
    let pipeline = pipeline(collaborators(pages.clone()), &llm);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut sink = ProgressSink::new(tx);
    let outcome = pipeline
        .run_candidates(scenario_candidates(), &mut sink)
        .await
        .unwrap();

    // Core a, b; tail match c; escalation ran but found nothing
    let urls: Vec<_> = outcome.evidence.entries().iter().map(|e| e.url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["https://a.example/about", "https://b.example/bio", "https://c.example/talk"]
    );
    assert_eq!(outcome.evidence.count(EvidenceOrigin::Matched), 1);
    assert_eq!(outcome.evidence.count(EvidenceOrigin::Escalated), 0);
    assert!(outcome.escalated);
    assert_eq!(outcome.filter.evaluated, 3);
    assert_eq!(outcome.filter.fetch_failures, 1);
    assert_eq!(outcome.profile.name, "Jane Doe");
    assert_eq!(outcome.extraction.attempts, 1);

    let prompt = llm.last_prompt().unwrap();
    assert!(prompt.contains("Jane writes compilers in Rust."));
    assert!(prompt.contains("presented her Rust compilers work"));
    assert!(!prompt.contains("Portland"));

    // Core pages are fetched once even though both stages need their text
    let fetched = pages.fetched();
    assert_eq!(fetched.iter().filter(|u| *u == "https://a.example/about").count(), 1);

    let events = drain(&mut rx);
    let stages: Vec<_> = progress(&events).into_iter().map(|(s, _)| s).collect();
    assert_eq!(
        stages,
        vec![Stage::ClusteringAndSignature, Stage::Filtering, Stage::Escalating, Stage::Extracting]
    );
    assert!(matches!(events.last(), Some(PipelineEvent::Done(_))));
}

#[tokio::test]
async fn test_enough_matches_skip_escalation() {
    let pages = Arc::new(FakePages::with(&[
        ("https://a.example/about", "Jane Doe Acme engineer Seattle Rust compilers"),
        ("https://c.example/one", "Jane Doe Acme engineer Seattle Rust"),
        ("https://d.example/two", "Acme engineer Jane Doe Seattle compilers"),
    ]));
    let llm = MockProvider::new(PROFILE_JSON);
    let pipeline = pipeline(collaborators(pages), &llm);

    let candidates = vec![
        CandidateMatch::new(99, "https://a.example/about"),
        CandidateMatch::new(30, "https://c.example/one"),
        CandidateMatch::new(29, "https://d.example/two"),
    ];
    let outcome = pipeline
        .run_candidates(candidates, &mut ProgressSink::silent())
        .await
        .unwrap();

    assert!(!outcome.escalated);
    assert_eq!(outcome.evidence.count(EvidenceOrigin::Matched), 2);
}

#[tokio::test]
async fn test_retry_until_third_attempt() {
    let llm = MockProvider::new(PROFILE_JSON);
    llm.push_response("Sorry, I cannot help with that.");
    llm.push_response(r#"{"raw_response": "name: Jane"}"#);
    let pipeline = pipeline(collaborators(Arc::new(scenario_pages())), &llm);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut sink = ProgressSink::new(tx);
    let outcome = pipeline
        .run_candidates(scenario_candidates(), &mut sink)
        .await
        .unwrap();

    assert_eq!(outcome.extraction.attempts, 3);
    assert_eq!(outcome.profile.workplace, "Acme");
    assert_eq!(llm.call_count(), 3);

    let messages: Vec<_> = progress(&drain(&mut rx))
        .into_iter()
        .filter(|(stage, _)| *stage == Stage::Extracting)
        .map(|(_, message)| message)
        .collect();
    assert_eq!(
        messages,
        vec![
            "Summarizing person information".to_string(),
            "Attempt 1/3: LLM returned malformatted summary, retrying...".to_string(),
            "Attempt 2/3: LLM returned malformatted summary, retrying...".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_exhausted_extraction_fails_the_run() {
    let llm = MockProvider::new("no profile here");
    let pipeline = pipeline(collaborators(Arc::new(scenario_pages())), &llm);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut sink = ProgressSink::new(tx);
    let err = pipeline
        .run_candidates(scenario_candidates(), &mut sink)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::ExtractionExhausted { attempts: 3, .. }));
    assert_eq!(llm.call_count(), 3);

    match drain(&mut rx).last() {
        Some(PipelineEvent::Failed { stage, message }) => {
            assert_eq!(*stage, Stage::Extracting);
            assert!(message.starts_with("LLM failed to return a valid summary"));
        }
        other => panic!("unexpected final event: {:?}", other),
    }
}

#[tokio::test]
async fn test_upstream_search_error_is_verbatim() {
    let llm = MockProvider::new(PROFILE_JSON);
    let pipeline = pipeline(collaborators(Arc::new(FakePages::default())), &llm).with_face_search(
        Arc::new(FakeFaceSearch {
            result: Err("Not enough credits (NO_CREDITS)".to_string()),
        }),
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut sink = ProgressSink::new(tx);
    let err = pipeline.run(b"jpeg", &mut sink).await.unwrap_err();

    assert_eq!(err, PipelineError::UpstreamSearch("Not enough credits (NO_CREDITS)".to_string()));

    let events = drain(&mut rx);
    assert_eq!(progress(&events), vec![(Stage::Searching, "Running face search".to_string())]);
    match events.last() {
        Some(PipelineEvent::Failed { stage, message }) => {
            assert_eq!(*stage, Stage::Searching);
            assert_eq!(message, "Not enough credits (NO_CREDITS)");
        }
        other => panic!("unexpected final event: {:?}", other),
    }
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_empty_search_results_fail() {
    let llm = MockProvider::new(PROFILE_JSON);
    let pipeline = pipeline(collaborators(Arc::new(FakePages::default())), &llm)
        .with_face_search(Arc::new(FakeFaceSearch { result: Ok(Vec::new()) }));

    let err = pipeline.run(b"jpeg", &mut ProgressSink::silent()).await.unwrap_err();
    assert_eq!(err, PipelineError::EmptyCandidateSet);

    let err = pipeline
        .run_candidates(Vec::new(), &mut ProgressSink::silent())
        .await
        .unwrap_err();
    assert_eq!(err, PipelineError::EmptyCandidateSet);
}

#[tokio::test]
async fn test_run_without_face_search_is_a_config_error() {
    let llm = MockProvider::new(PROFILE_JSON);
    let pipeline = pipeline(collaborators(Arc::new(FakePages::default())), &llm);

    let err = pipeline.run(b"jpeg", &mut ProgressSink::silent()).await.unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}

#[tokio::test]
async fn test_no_text_anywhere_skips_the_llm() {
    let llm = MockProvider::new(PROFILE_JSON);
    let pipeline = pipeline(collaborators(Arc::new(FakePages::default())), &llm);

    let err = pipeline
        .run_candidates(scenario_candidates(), &mut ProgressSink::silent())
        .await
        .unwrap_err();

    assert_eq!(err, PipelineError::NoEvidenceText);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_escalation_through_linked_profiles() {
    let pages = Arc::new(FakePages::with(&[
        ("https://github.com/jdoe", "jdoe has 12 repositories available"),
        ("https://www.linkedin.com/in/janetdoe", "Sign in to view this profile"),
        ("https://janedoe.dev", "Janet Doe writes about compilers"),
        ("https://news.example/janet", "Janet Doe joins Acme as principal engineer"),
    ]));
    let web = Arc::new(FakeWeb {
        hits: vec![
            SearchHit {
                title: "Janet Doe - Engineer - Seattle | LinkedIn".to_string(),
                url: "https://www.linkedin.com/in/janetdoe".to_string(),
                body: "Janet Doe".to_string(),
            },
            SearchHit {
                title: "Janet Doe joins Acme".to_string(),
                url: "https://news.example/janet".to_string(),
                body: String::new(),
            },
            SearchHit {
                title: "Unrelated".to_string(),
                url: "https://other.example".to_string(),
                body: "nothing to see".to_string(),
            },
            SearchHit {
                title: "Conference talks".to_string(),
                url: "https://talks.example/jd".to_string(),
                body: "A talk by janet doe on parsers".to_string(),
            },
        ],
        queries: Mutex::new(Vec::new()),
    });
    let collaborators = Collaborators {
        pages: pages.clone(),
        hosting: Arc::new(FakeHosting {
            profile: Some(HostedProfile {
                login: "jdoe".to_string(),
                name: Some("Jane Doe".to_string()),
                email: None,
                blog_url: Some("https://janedoe.dev".to_string()),
                profile_url: Some("https://github.com/jdoe".to_string()),
            }),
            readme: "Compiler hacker".to_string(),
        }),
        network: Arc::new(FakeNetwork {
            identity: NetworkIdentity {
                name: "Janet Doe".to_string(),
                location: "Seattle".to_string(),
            },
        }),
        web: web.clone(),
    };
    let llm = MockProvider::new(PROFILE_JSON);
    let pipeline = pipeline(collaborators, &llm);

    let candidates = vec![
        CandidateMatch::new(97, "https://github.com/jdoe"),
        CandidateMatch::new(96, "https://www.linkedin.com/in/janetdoe"),
        CandidateMatch::new(20, "https://x.example"),
        CandidateMatch::new(18, "https://y.example"),
        CandidateMatch::new(15, "https://z.example"),
    ];
    let outcome = pipeline
        .run_candidates(candidates, &mut ProgressSink::silent())
        .await
        .unwrap();

    assert!(outcome.escalated);
    assert_eq!(
        web.queries.lock().unwrap().clone(),
        vec![("Janet Doe Seattle".to_string(), 10)]
    );

    // blog, news and talks survive the filter; talks has no text
    let escalated: Vec<_> = outcome
        .evidence
        .entries()
        .iter()
        .filter(|e| e.origin == EvidenceOrigin::Escalated)
        .map(|e| (e.score, e.url.as_str()))
        .collect();
    assert_eq!(escalated, vec![(0, "https://janedoe.dev"), (0, "https://news.example/janet")]);
    assert!(pages.fetched().contains(&"https://talks.example/jd".to_string()));
    assert!(!pages.fetched().contains(&"https://other.example".to_string()));

    let prompt = llm.last_prompt().unwrap();
    assert!(prompt.contains("GitHub source suggests the person's name is Jane Doe."));
    assert!(prompt.contains("LinkedIn source suggests the person's name is Janet Doe."));
    assert!(prompt.contains("Jane Doe's GitHub README: Compiler hacker."));
    assert!(prompt.contains("Janet Doe joins Acme as principal engineer"));
}

#[tokio::test]
async fn test_spawned_run_streams_until_done() {
    let llm = MockProvider::new(PROFILE_JSON);
    let pipeline = Arc::new(
        pipeline(collaborators(Arc::new(scenario_pages())), &llm).with_face_search(Arc::new(
            FakeFaceSearch {
                result: Ok(scenario_candidates()),
            },
        )),
    );

    let mut rx = pipeline.spawn(RunInput::Image(b"jpeg".to_vec()));
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    let first = progress(&events).into_iter().next().unwrap();
    assert_eq!(first, (Stage::Searching, "Running face search".to_string()));
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    match events.last() {
        Some(PipelineEvent::Done(outcome)) => assert_eq!(outcome.profile.name, "Jane Doe"),
        other => panic!("unexpected final event: {:?}", other),
    }

    // every event belongs to the same run
    let run_ids: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Progress(p) => Some(p.run_id),
            _ => None,
        })
        .collect();
    assert!(run_ids.windows(2).all(|w| w[0] == w[1]));
}
