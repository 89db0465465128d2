//! Tests for declaration routing.

use super::*;
use crate::catalog::{CatalogDefinition, LibraryDefinition, VersionCatalog};
use crate::dependency::{
    Capability, CapabilityRequirement, ExcludeRule, MinimalDependency, ModuleCoordinates,
};
use crate::notation::{BucketRef, ProviderConvertible, ProviderNotation};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn rendered(deps: &ComponentDependencies, role: BucketRole) -> Vec<String> {
    deps.bucket(role).dependencies().map(ToString::to_string).collect()
}

fn bundle_of(alias: &str, coordinates: &[(&str, &str, &str)]) -> Provider<Bundle> {
    let elements: Vec<MinimalDependency> = coordinates
        .iter()
        .map(|(g, n, v)| ModuleCoordinates::new(*g, *n, Some(*v)).into())
        .collect();
    let alias = alias.to_string();
    Provider::new(alias.clone(), move || Ok(Bundle::new(alias.clone(), elements.clone())))
}

fn deps_error(err: &anyhow::Error) -> &DepsError {
    err.downcast_ref::<DepsError>().expect("expected a DepsError")
}

mod eager_tests {
    use super::*;

    #[test]
    fn test_eager_notation_is_appended_immediately() {
        let mut deps = ComponentDependencies::new();
        deps.implementation("g:lib:1.0").unwrap();

        assert_eq!(rendered(&deps, BucketRole::Implementation), ["g:lib:1.0"]);
        assert_eq!(deps.bucket(BucketRole::Implementation).pending_count(), 0);
    }

    #[test]
    fn test_each_role_targets_its_own_bucket() {
        let mut deps = ComponentDependencies::new();
        deps.implementation("g:impl:1").unwrap();
        deps.compile_only("g:co:1").unwrap();
        deps.runtime_only("g:ro:1").unwrap();
        deps.annotation_processor("g:ap:1").unwrap();

        assert_eq!(rendered(&deps, BucketRole::Implementation), ["g:impl:1"]);
        assert_eq!(rendered(&deps, BucketRole::CompileOnly), ["g:co:1"]);
        assert_eq!(rendered(&deps, BucketRole::RuntimeOnly), ["g:ro:1"]);
        assert_eq!(rendered(&deps, BucketRole::AnnotationProcessor), ["g:ap:1"]);
    }

    #[test]
    fn test_customizer_is_applied_before_insertion() {
        let mut deps = ComponentDependencies::new();
        deps.implementation_with("g:lib:1.0", |dep| {
            dep.exclude(ExcludeRule::new(Some("commons-logging"), None::<String>));
            Ok(())
        })
        .unwrap();

        let dep = deps.bucket(BucketRole::Implementation).dependencies().next().unwrap();
        assert_eq!(dep.excludes().len(), 1);
    }

    #[test]
    fn test_customizer_error_propagates_and_nothing_is_added() {
        let mut deps = ComponentDependencies::new();
        let err = deps
            .compile_only_with("g:lib:1.0", |_| anyhow::bail!("customizer refused"))
            .unwrap_err();

        assert_eq!(err.to_string(), "customizer refused");
        assert!(deps.bucket(BucketRole::CompileOnly).is_empty());
    }

    #[test]
    fn test_customizer_replacing_the_target_is_rejected() {
        let mut deps = ComponentDependencies::new();
        let err = deps
            .implementation_with("g:lib:1.0", |dep| {
                *dep = Dependency::project(":evil");
                Ok(())
            })
            .unwrap_err();

        assert!(matches!(deps_error(&err), DepsError::CustomizerReplacedTarget { .. }));
        assert!(deps.bucket(BucketRole::Implementation).is_empty());
    }

    #[test]
    fn test_invalid_coordinates_fail_at_declaration() {
        let mut deps = ComponentDependencies::new();
        let err = deps.implementation("just-a-name").unwrap_err();
        assert!(matches!(deps_error(&err), DepsError::InvalidCoordinates { .. }));
    }

    #[test]
    fn test_custom_bucket_names_are_used() {
        let deps = ComponentDependencies::with_buckets(
            DependencyBucket::new("testImplementation"),
            DependencyBucket::new("testCompileOnly"),
            DependencyBucket::new("testRuntimeOnly"),
            DependencyBucket::new("testAnnotationProcessor"),
        );
        let names: Vec<String> = deps.into_buckets().iter().map(|b| b.name().to_string()).collect();
        assert_eq!(
            names,
            ["testImplementation", "testCompileOnly", "testRuntimeOnly", "testAnnotationProcessor"]
        );
    }
}

mod bundle_tests {
    use super::*;

    #[test]
    fn test_bundle_is_expanded_immediately_in_order() {
        let mut deps = ComponentDependencies::new();
        deps.implementation("g:lib:1.0").unwrap();
        deps.implementation(bundle_of("pair", &[("g1", "a", "1"), ("g1", "b", "2")])).unwrap();

        assert_eq!(rendered(&deps, BucketRole::Implementation), ["g:lib:1.0", "g1:a:1", "g1:b:2"]);
        assert_eq!(deps.bucket(BucketRole::Implementation).pending_count(), 0);
    }

    #[test]
    fn test_bundle_provider_is_forced_at_declaration_time() {
        let forced = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&forced);
        let provider = Provider::new("counted", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Bundle::new("counted", vec![ModuleCoordinates::new("g", "a", Some("1")).into()]))
        });

        let mut deps = ComponentDependencies::new();
        deps.runtime_only(provider).unwrap();
        assert_eq!(forced.load(Ordering::SeqCst), 1);

        deps.resolve_pending().unwrap();
        assert_eq!(forced.load(Ordering::SeqCst), 1);
        assert_eq!(deps.bucket(BucketRole::RuntimeOnly).len(), 1);
    }

    #[test]
    fn test_customizer_runs_once_per_bundle_element() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut deps = ComponentDependencies::new();
        let trio = bundle_of("trio", &[("g", "a", "1"), ("g", "b", "1"), ("g", "c", "1")]);
        deps.implementation_with(trio, move |dep| {
            counter.fetch_add(1, Ordering::SeqCst);
            dep.because("bundled");
            Ok(())
        })
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(
            deps.bucket(BucketRole::Implementation)
                .dependencies()
                .all(|d| d.reason() == Some("bundled"))
        );
    }

    #[test]
    fn test_invalid_element_fails_whole_bundle() {
        let elements = vec![
            MinimalDependency::new(ModuleCoordinates::new("g", "a", Some("1"))),
            MinimalDependency::new(ModuleCoordinates::new("g", "", Some("1"))),
        ];
        let provider = Provider::new("broken", move || Ok(Bundle::new("broken", elements.clone())));

        let mut deps = ComponentDependencies::new();
        let err = deps.implementation(provider).unwrap_err();

        assert_eq!(
            deps_error(&err),
            &DepsError::InvalidBundleElement {
                bundle: "broken".to_string(),
                position: 1,
                reason: "name is missing".to_string(),
            }
        );
        assert!(deps.bucket(BucketRole::Implementation).is_empty());
    }

    #[test]
    fn test_empty_bundle_adds_nothing() {
        let mut deps = ComponentDependencies::new();
        deps.implementation(bundle_of("empty", &[])).unwrap();
        assert!(deps.bucket(BucketRole::Implementation).is_empty());
    }
}

mod deferred_tests {
    use super::*;

    #[test]
    fn test_deferred_notation_is_added_on_resolution() {
        let mut deps = ComponentDependencies::new();
        deps.implementation(Notation::deferred("x", || Ok("g:x:3".into()))).unwrap();

        assert!(deps.bucket(BucketRole::Implementation).is_empty());
        assert_eq!(deps.resolve_pending().unwrap(), 1);
        assert_eq!(rendered(&deps, BucketRole::Implementation), ["g:x:3"]);
    }

    #[test]
    fn test_registration_never_forces_the_provider() {
        let forced = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&forced);
        let mut deps = ComponentDependencies::new();
        deps.runtime_only(Notation::deferred("counted", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok("g:x:3".into())
        }))
        .unwrap();

        assert_eq!(forced.load(Ordering::SeqCst), 0);
        deps.resolve_pending().unwrap();
        deps.resolve_pending().unwrap();
        assert_eq!(forced.load(Ordering::SeqCst), 1);
        assert_eq!(deps.bucket(BucketRole::RuntimeOnly).len(), 1);
    }

    #[test]
    fn test_deferred_and_eager_keep_declaration_order() {
        let mut deps = ComponentDependencies::new();
        deps.implementation("g:a:1").unwrap();
        deps.implementation(Notation::deferred("b", || Ok("g:b:2".into()))).unwrap();
        deps.implementation("g:c:3").unwrap();
        deps.implementation(Notation::deferred("d", || Ok("g:d:4".into()))).unwrap();

        assert_eq!(rendered(&deps, BucketRole::Implementation), ["g:a:1", "g:c:3"]);
        deps.resolve_pending().unwrap();
        assert_eq!(
            rendered(&deps, BucketRole::Implementation),
            ["g:a:1", "g:b:2", "g:c:3", "g:d:4"]
        );
    }

    #[test]
    fn test_customizer_applies_at_resolution_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut deps = ComponentDependencies::new();
        deps.runtime_only_with(Notation::deferred("x", || Ok("g:x:3".into())), move |dep| {
            counter.fetch_add(1, Ordering::SeqCst);
            dep.set_transitive(false);
            Ok(())
        })
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        deps.resolve_pending().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let dep = deps.bucket(BucketRole::RuntimeOnly).dependencies().next().unwrap();
        assert!(!dep.is_transitive());
    }

    #[test]
    fn test_invalid_deferred_coordinates_fail_at_resolution() {
        let mut deps = ComponentDependencies::new();
        deps.implementation(Notation::deferred("bad", || Ok("nope".into()))).unwrap();

        let err = deps.resolve_pending().unwrap_err();
        assert!(matches!(deps_error(&err), DepsError::InvalidCoordinates { .. }));
    }
}

mod bucket_reference_tests {
    use super::*;

    #[test]
    fn test_direct_bucket_reference_is_rejected() {
        let mut deps = ComponentDependencies::new();
        let runtime = deps.bucket(BucketRole::RuntimeOnly).reference();
        let err = deps.implementation(runtime).unwrap_err();

        assert_eq!(
            deps_error(&err),
            &DepsError::BucketAsDependency {
                bucket: "runtimeOnly".to_string(),
                target: "implementation".to_string(),
            }
        );
        assert!(deps.bucket(BucketRole::Implementation).is_empty());
    }

    #[test]
    fn test_deferred_bucket_reference_is_rejected_on_resolution() {
        let mut deps = ComponentDependencies::new();
        deps.compile_only(Notation::deferred("bucket", || {
            Ok(BucketRef::new("annotationProcessor").into())
        }))
        .unwrap();

        let err = deps.resolve_pending().unwrap_err();
        assert_eq!(
            deps_error(&err),
            &DepsError::BucketAsDependency {
                bucket: "annotationProcessor".to_string(),
                target: "compileOnly".to_string(),
            }
        );
    }

    #[test]
    fn test_convertible_bucket_reference_is_rejected_on_resolution() {
        #[derive(Debug)]
        struct BucketAccessor;

        impl ProviderConvertible for BucketAccessor {
            fn as_provider(&self) -> ProviderNotation {
                ProviderNotation::Single(Provider::new("configurations.runtimeOnly", || {
                    Ok(BucketRef::new("runtimeOnly").into())
                }))
            }
        }

        let mut deps = ComponentDependencies::new();
        deps.implementation(Notation::convertible(BucketAccessor)).unwrap();
        assert_eq!(deps.bucket(BucketRole::Implementation).pending_count(), 1);

        let err = deps.resolve_pending().unwrap_err();
        assert_eq!(
            deps_error(&err),
            &DepsError::BucketAsDependency {
                bucket: "runtimeOnly".to_string(),
                target: "implementation".to_string(),
            }
        );
        assert!(deps.bucket(BucketRole::Implementation).is_empty());
    }

    #[test]
    fn test_every_target_bucket_rejects_bucket_references() {
        for role in BucketRole::ALL {
            let mut deps = ComponentDependencies::new();
            let err = deps.add(role, BucketRef::new("other"), None).unwrap_err();
            assert!(matches!(
                deps_error(&err),
                DepsError::BucketAsDependency { target, .. } if target == role.bucket_name()
            ));
        }
    }
}

mod convertible_tests {
    use super::*;

    fn catalog() -> VersionCatalog {
        let mut definition = CatalogDefinition::default();
        definition.libraries.insert(
            "junit".to_string(),
            LibraryDefinition::Notation("org.junit:junit:4.13.2".to_string()),
        );
        definition.libraries.insert(
            "hamcrest".to_string(),
            LibraryDefinition::Notation("org.hamcrest:hamcrest:2.2".to_string()),
        );
        definition
            .bundles
            .insert("testing".to_string(), vec!["junit".to_string(), "hamcrest".to_string()]);
        VersionCatalog::new(definition)
    }

    #[test]
    fn test_library_accessor_is_deferred() {
        let catalog = catalog();
        let mut deps = ComponentDependencies::new();
        deps.implementation(catalog.library("junit")).unwrap();

        assert!(deps.bucket(BucketRole::Implementation).is_empty());
        deps.resolve_pending().unwrap();
        assert_eq!(rendered(&deps, BucketRole::Implementation), ["org.junit:junit:4.13.2"]);
    }

    #[test]
    fn test_bundle_accessor_is_expanded_eagerly() {
        let catalog = catalog();
        let mut deps = ComponentDependencies::new();
        deps.implementation(catalog.bundle("testing")).unwrap();

        assert_eq!(
            rendered(&deps, BucketRole::Implementation),
            ["org.junit:junit:4.13.2", "org.hamcrest:hamcrest:2.2"]
        );
    }

    #[test]
    fn test_unknown_bundle_fails_at_declaration() {
        let mut deps = ComponentDependencies::new();
        let err = deps.implementation(catalog().bundle("missing")).unwrap_err();
        assert!(matches!(deps_error(&err), DepsError::CatalogEntryNotFound { .. }));
    }

    #[test]
    fn test_convertible_is_unwrapped_only_once() {
        #[derive(Debug)]
        struct Counting(Arc<AtomicUsize>);

        impl ProviderConvertible for Counting {
            fn as_provider(&self) -> ProviderNotation {
                self.0.fetch_add(1, Ordering::SeqCst);
                ProviderNotation::Single(Provider::of(ConcreteNotation::from("g:lib:1.0")))
            }
        }

        let conversions = Arc::new(AtomicUsize::new(0));
        let mut deps = ComponentDependencies::new();
        deps.implementation(Notation::convertible(Counting(Arc::clone(&conversions)))).unwrap();
        assert_eq!(conversions.load(Ordering::SeqCst), 1);
    }
}

mod test_fixtures_tests {
    use super::*;

    #[test]
    fn test_project_fixtures_requirement() {
        let mut deps = ComponentDependencies::new();
        let fixtures = deps.project_test_fixtures(&ProjectRef::new(":core")).unwrap();
        deps.implementation(fixtures).unwrap();

        let dep = deps.bucket(BucketRole::Implementation).dependencies().next().unwrap();
        assert_eq!(dep.project_path(), Some(":core"));
        assert_eq!(
            dep.capabilities(),
            [CapabilityRequirement::ProjectTestFixtures {
                project_path: ":core".to_string()
            }]
        );
    }

    #[test]
    fn test_module_fixtures_requirement_keeps_coordinates() {
        let deps = ComponentDependencies::new();
        let original = Dependency::module(ModuleCoordinates::new("g", "lib", Some("1.0")));
        let fixtures = deps.test_fixtures(original.clone()).unwrap();

        assert_eq!(fixtures.coordinates(), original.coordinates());
        assert_eq!(
            fixtures.capabilities(),
            [CapabilityRequirement::Module(Capability::new(
                "g",
                "lib-test-fixtures",
                None::<String>
            ))]
        );
    }

    #[test]
    fn test_class_path_helpers() {
        let mut deps = ComponentDependencies::new();
        let api = deps.build_api();
        let kit = deps.test_kit();
        let groovy = deps.local_groovy();
        deps.compile_only(api).unwrap();
        deps.implementation(kit).unwrap();
        deps.implementation(groovy).unwrap();

        assert_eq!(rendered(&deps, BucketRole::CompileOnly), ["build-api()"]);
        assert_eq!(rendered(&deps, BucketRole::Implementation), ["test-kit()", "local-groovy()"]);
        assert!(deps.test_fixtures(deps.test_kit()).is_err());
    }
}

#[test]
fn test_bucket_role_names_round_trip() {
    for role in BucketRole::ALL {
        assert_eq!(role.bucket_name().parse::<BucketRole>().unwrap(), role);
    }
    let err = "api".parse::<BucketRole>().unwrap_err();
    assert_eq!(err, DepsError::UnknownBucket { name: "api".to_string() });
}
