//! Load pass scenarios across the manager, context and loaders

use crate::*;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Plugin that requests its dependencies in order, then optionally fails
struct Node {
    name: &'static str,
    deps: Vec<&'static str>,
    fail: bool,
    mounts: Arc<AtomicUsize>,
}

impl Node {
    fn new(name: &'static str, deps: &[&'static str]) -> Self {
        Self {
            name,
            deps: deps.to_vec(),
            fail: false,
            mounts: Arc::default(),
        }
    }

    fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn counted(mut self, mounts: &Arc<AtomicUsize>) -> Self {
        self.mounts = mounts.clone();
        self
    }
}

impl Plugin<()> for Node {
    fn name(&self) -> &str {
        self.name
    }

    fn mount(&self, ctx: &Context<'_, ()>) -> Result<()> {
        for dep in &self.deps {
            ctx.lazy(dep)?;
        }
        if self.fail {
            return Err(ScaffoldError::msg(format!("{} refused to mount", self.name)));
        }
        self.mounts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn manager(nodes: Vec<Node>) -> Manager<()> {
    let manager = Manager::new();
    for node in nodes {
        manager.register(node);
    }
    manager
}

#[test]
fn test_dependency_is_recorded_with_runtimes() {
    let manager = manager(vec![Node::new("A", &[]), Node::new("B", &["A"])]);
    manager.load(&(), Vec::new()).unwrap();

    let b = manager.lookup("B").unwrap();
    assert_eq!(b.dependencies, vec![Dependency::new("B", "A")]);
    assert!(b.runtime > Duration::ZERO);
    assert!(manager.lookup("A").unwrap().runtime > Duration::ZERO);
    assert!(manager.lookup("A").unwrap().dependencies.is_empty());
}

#[test]
fn test_dependency_mounted_by_its_dependent() {
    // "B" sorts before "Z", so Z is first mounted from inside B
    let manager = manager(vec![Node::new("B", &["Z"]), Node::new("Z", &[])]);
    manager.load(&(), Vec::new()).unwrap();

    assert_eq!(manager.graph(), vec![Dependency::new("B", "Z")]);
    assert!(manager.is_loaded("Z"));
}

#[test]
fn test_self_referential_dependency() {
    let manager = manager(vec![Node::new("A", &["A"])]);
    let err = manager.load(&(), Vec::new()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SelfReferentialDependency);
    assert!(err.to_string().contains('A'));
    assert!(!manager.is_loaded("A"));
}

#[test]
fn test_circular_dependency() {
    let manager = manager(vec![Node::new("A", &["B"]), Node::new("B", &["A"])]);
    let err = manager.load(&(), Vec::new()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CircularDependency);
    assert_eq!(err.plugin_chain(), vec!["A", "B"]);
    assert!(!manager.is_loaded("A"));
    assert!(!manager.is_loaded("B"));
}

#[test]
fn test_longer_circular_chain() {
    let manager = manager(vec![
        Node::new("A", &["B"]),
        Node::new("B", &["C"]),
        Node::new("C", &["A"]),
    ]);
    let err = manager.lazy(&(), "A", Vec::new()).unwrap_err();

    assert!(err.is(ErrorKind::CircularDependency));
    assert_eq!(err.plugin_chain(), vec!["A", "B", "C"]);
}

#[test]
fn test_missing_dependency_versus_not_registered() {
    let manager = manager(vec![Node::new("A", &["ghost"])]);

    let err = manager.load(&(), Vec::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingDependency);
    assert!(err.to_string().contains("ghost"));

    let err = manager.lazy(&(), "ghost", Vec::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PluginNotRegistered);
}

#[test]
fn test_shared_dependency_mounts_once() {
    let base = Arc::new(AtomicUsize::new(0));
    let manager = manager(vec![
        Node::new("base", &[]).counted(&base),
        Node::new("left", &["base"]),
        Node::new("right", &["base"]),
        Node::new("top", &["left", "right"]),
    ]);
    manager.load(&(), Vec::new()).unwrap();

    assert_eq!(base.load(Ordering::SeqCst), 1);
    assert_eq!(
        manager.graph(),
        vec![
            Dependency::new("left", "base"),
            Dependency::new("right", "base"),
            Dependency::new("top", "left"),
            Dependency::new("top", "right"),
        ]
    );
}

#[test]
fn test_repeated_requests_record_one_edge() {
    let manager = manager(vec![Node::new("A", &["B", "B", "B"]), Node::new("B", &[])]);
    manager.load(&(), Vec::new()).unwrap();
    assert_eq!(manager.graph(), vec![Dependency::new("A", "B")]);
}

#[test]
fn test_failure_propagates_to_every_ancestor() {
    let manager = manager(vec![
        Node::new("A", &["B"]),
        Node::new("B", &["C"]),
        Node::new("C", &[]).failing(),
    ]);
    let err = manager.load(&(), Vec::new()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Plugin);
    assert_eq!(err.plugin_chain(), vec!["A", "B", "C"]);
    assert!(err.to_string().contains("C refused to mount"));
    for name in ["A", "B", "C"] {
        assert!(!manager.is_loaded(name));
    }
}

/// Swallows the failure of its first dependency and carries on
struct Tolerant;

impl Plugin<()> for Tolerant {
    fn name(&self) -> &str {
        "tolerant"
    }

    fn mount(&self, ctx: &Context<'_, ()>) -> Result<()> {
        let _ = ctx.lazy("bad");
        ctx.lazy("good")
    }
}

#[test]
fn test_latched_failure_fails_later_requests() {
    let good = Arc::new(AtomicUsize::new(0));
    let manager = manager(vec![
        Node::new("bad", &[]).failing(),
        Node::new("good", &[]).counted(&good),
    ]);
    manager.register(Tolerant);

    let err = manager.lazy(&(), "tolerant", Vec::new()).unwrap_err();
    assert!(err.to_string().contains("bad refused to mount"));
    assert_eq!(good.load(Ordering::SeqCst), 0);
    assert!(!manager.is_loaded("tolerant"));
}

#[test]
fn test_partial_mounts_stay_after_failure() {
    let manager = manager(vec![Node::new("A", &[]), Node::new("B", &[]).failing()]);
    assert!(manager.load(&(), Vec::new()).is_err());

    assert!(manager.is_loaded("A"));
    assert!(!manager.is_loaded("B"));
}

/// Cancels its own load pass
struct Canceller;

impl Plugin<()> for Canceller {
    fn name(&self) -> &str {
        "A"
    }

    fn mount(&self, ctx: &Context<'_, ()>) -> Result<()> {
        ctx.cancellation().cancel();
        Ok(())
    }
}

#[test]
fn test_cancellation_stops_at_the_next_step() {
    let manager = manager(vec![Node::new("B", &[])]);
    manager.register(Canceller);

    let err = manager
        .load_with_cancellation(CancellationToken::new(), &(), Vec::new())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(manager.is_loaded("A"));
    assert!(!manager.is_loaded("B"));
}

#[test]
fn test_loaders_skip_and_alias() {
    let manager = manager(vec![
        Node::new("A", &["legacy"]),
        Node::new("B", &["optional"]),
        Node::new("modern", &[]),
    ]);
    let loaders: Vec<Box<dyn Loader>> = vec![
        Box::new(SkipLoader::new(["optional"])),
        Box::new(AliasLoader::new().alias("legacy", "modern")),
    ];
    manager.load(&(), loaders).unwrap();

    assert_eq!(manager.graph(), vec![Dependency::new("A", "modern")]);
    assert!(manager.is_loaded("B"));
}

#[test]
fn test_skipped_plugins_are_not_mounted() {
    let manager = manager(vec![Node::new("A", &[]), Node::new("B", &[])]);
    let loaders: Vec<Box<dyn Loader>> = vec![Box::new(SkipLoader::new(["B"]))];
    manager.load(&(), loaders).unwrap();

    assert!(manager.is_loaded("A"));
    assert!(!manager.is_loaded("B"));
}

#[test]
fn test_loader_chain_runs_first_loader_outermost() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let first = seen.clone();
    let second = seen.clone();
    let manager = manager(vec![Node::new("A", &[])]);

    let loaders: Vec<Box<dyn Loader>> = vec![
        Box::new(from_fn(move |name, next| {
            first.lock().push(format!("first:{name}"));
            next(name)
        })),
        Box::new(from_fn(move |name, next| {
            second.lock().push(format!("second:{name}"));
            next(name)
        })),
    ];
    manager.load(&(), loaders).unwrap();

    assert_eq!(*seen.lock(), vec!["first:A", "second:A"]);
}

#[test]
fn test_loader_order_changes_the_outcome() {
    let alias_then_skip = manager(vec![Node::new("A", &["x"]), Node::new("y", &[])]);
    let loaders: Vec<Box<dyn Loader>> = vec![
        Box::new(AliasLoader::new().alias("x", "y")),
        Box::new(SkipLoader::new(["y"])),
    ];
    alias_then_skip.lazy(&(), "A", loaders).unwrap();
    assert!(!alias_then_skip.is_loaded("y"));

    let skip_then_alias = manager(vec![Node::new("A", &["x"]), Node::new("y", &[])]);
    let loaders: Vec<Box<dyn Loader>> = vec![
        Box::new(SkipLoader::new(["y"])),
        Box::new(AliasLoader::new().alias("x", "y")),
    ];
    skip_then_alias.lazy(&(), "A", loaders).unwrap();
    assert!(skip_then_alias.is_loaded("y"));
}

/// Resolves `x` as itself, then also pulls in `y` and `x` again
fn fan_out() -> Vec<Box<dyn Loader>> {
    let loader = from_fn(|name, next| {
        next(name)?;
        if name == "x" {
            next("y")?;
            next("x")?;
        }
        Ok(())
    });
    let loaders: Vec<Box<dyn Loader>> = vec![Box::new(loader)];
    loaders
}

#[test]
fn test_loader_resolving_several_names_records_edges_for_the_requester() {
    let manager = manager(vec![
        Node::new("A", &["x"]),
        Node::new("x", &[]),
        Node::new("y", &[]),
    ]);
    manager.lazy(&(), "y", fan_out()).unwrap();
    manager.lazy(&(), "A", fan_out()).unwrap();

    assert_eq!(
        manager.graph(),
        vec![Dependency::new("A", "x"), Dependency::new("A", "y")]
    );
    assert!(manager.is_loaded("x"));
}

#[test]
fn test_loader_mounting_several_new_plugins() {
    let manager = manager(vec![
        Node::new("A", &["x"]),
        Node::new("x", &[]),
        Node::new("y", &["z"]),
        Node::new("z", &[]),
    ]);
    manager.lazy(&(), "A", fan_out()).unwrap();

    assert_eq!(
        manager.graph(),
        vec![
            Dependency::new("A", "x"),
            Dependency::new("A", "y"),
            Dependency::new("y", "z"),
        ]
    );
}

/// Parks inside its mount until the test thread has looked around
struct Parked {
    entered: Arc<Barrier>,
    release: Arc<Barrier>,
}

impl Plugin<()> for Parked {
    fn name(&self) -> &str {
        "slow"
    }

    fn mount(&self, ctx: &Context<'_, ()>) -> Result<()> {
        ctx.lazy("base")?;
        self.entered.wait();
        self.release.wait();
        Ok(())
    }
}

#[test]
fn test_diagnostics_are_readable_during_a_load_pass() {
    let entered = Arc::new(Barrier::new(2));
    let release = Arc::new(Barrier::new(2));
    let manager = Arc::new(manager(vec![Node::new("base", &[])]));
    manager.register(Parked {
        entered: entered.clone(),
        release: release.clone(),
    });

    let pass = {
        let manager = manager.clone();
        std::thread::spawn(move || manager.load(&(), Vec::new()))
    };

    entered.wait();
    let base_loaded = manager.is_loaded("base");
    let graph = manager.graph();
    let slow = manager.lookup("slow");
    release.wait();
    pass.join().unwrap().unwrap();

    assert!(base_loaded);
    assert_eq!(graph, vec![Dependency::new("slow", "base")]);
    assert_eq!(slow.map(|info| info.runtime), Some(Duration::ZERO));
    assert!(manager.is_loaded("slow"));
}

struct App {
    started: Hook<Vec<&'static str>>,
}

struct Db;

impl Plugin<App> for Db {
    fn name(&self) -> &str {
        "db"
    }

    fn mount(&self, ctx: &Context<'_, App>) -> Result<()> {
        ctx.app().started.add(|log: &mut Vec<&'static str>| {
            log.push("db");
            Ok(())
        });
        Ok(())
    }
}

struct Cache;

impl Plugin<App> for Cache {
    fn name(&self) -> &str {
        "cache"
    }

    fn mount(&self, ctx: &Context<'_, App>) -> Result<()> {
        ctx.lazy("db")?;
        ctx.app().started.add(|log: &mut Vec<&'static str>| {
            log.push("cache");
            Err(HookError::StopPropagation)
        });
        ctx.app().started.add(|log: &mut Vec<&'static str>| {
            log.push("unreachable");
            Ok(())
        });
        Ok(())
    }
}

#[test]
fn test_plugins_extend_app_hooks_in_dependency_order() {
    let app = App {
        started: Hook::new(),
    };
    let manager = Manager::new();
    manager.register(Cache);
    manager.register(Db);
    manager.load(&app, Vec::new()).unwrap();

    let mut log = Vec::new();
    app.started.trigger(&mut log).unwrap();
    assert_eq!(log, vec!["db", "cache"]);
    assert_eq!(app.started.len(), 3);
}
