//! Property-based tests for launcher message invariants

use amplirun::error::{LaunchError, RefTaxonomyFlavor};
use amplirun::manifest::{PipelineManifest, WorkflowDescriptor};
use amplirun::report;
use proptest::prelude::*;

fn descriptor_named(name: &str) -> WorkflowDescriptor {
    let manifest = PipelineManifest {
        name: name.to_string(),
        version: "1.0.0".to_string(),
        description: String::new(),
        homepage: None,
    };
    WorkflowDescriptor::new(&manifest, vec![])
}

/// Test that the missing-key message lists every valid key
#[test]
fn test_taxonomy_message_lists_every_key_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner.run(
        &prop::collection::btree_set("[a-z]{2,6}", 1..6),
        |keys| {
            let valid_keys: Vec<String> = keys.iter().cloned().collect();
            // a digit-only key cannot collide with the alphabetic keys
            let err = LaunchError::missing_taxonomy_key(
                RefTaxonomyFlavor::Dada2,
                "404",
                valid_keys.iter(),
            );
            let message = err.to_string();

            assert!(message.contains(&valid_keys.join(", ")));
            for key in &valid_keys {
                assert!(message.contains(key.as_str()));
            }
            assert!(message.contains("'404'"));

            Ok(())
        },
    ).unwrap();
}

/// Test that the message names the flavor that rejected the key
#[test]
fn test_taxonomy_message_names_flavor_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner.run(
        &prop::collection::btree_set("[a-z]{2,6}", 1..4),
        |keys| {
            let valid_keys: Vec<String> = keys.iter().cloned().collect();
            let dada = LaunchError::missing_taxonomy_key(
                RefTaxonomyFlavor::Dada2,
                "404",
                valid_keys.iter(),
            );
            let qiime = LaunchError::missing_taxonomy_key(
                RefTaxonomyFlavor::Qiime2,
                "404",
                valid_keys.iter(),
            );

            assert!(dada.to_string().contains("DADA2"));
            assert!(qiime.to_string().contains("QIIME2"));

            Ok(())
        },
    ).unwrap();
}

/// Test that the citation embeds the pipeline name exactly twice
#[test]
fn test_citation_embeds_name_twice_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner.run(&"[a-z]{3,8}/[a-z]{3,8}", |name| {
        // blob/master is the one alpha/alpha pair already present in the
        // constant citation text
        prop_assume!(name != "blob/master");

        let descriptor = descriptor_named(&name);
        let text = report::citation(&descriptor);
        assert_eq!(text.matches(name.as_str()).count(), 2);

        Ok(())
    }).unwrap();
}
