//! Integration tests for the multi-domain variant: domain taxonomies,
//! grouping isolation, and the zoom export/edit/import lifecycle.

use dsm_core::matrix::{Matrix, MatrixVariant};
use dsm_core::types::Color;

fn drivetrain_matrix() -> Matrix {
    let mut m = Matrix::new(MatrixVariant::MultiDomain);
    m.create_item_in_domain("axle", "mechanical").unwrap();
    m.create_item_in_domain("frame", "mechanical").unwrap();
    m.create_item_in_domain("ecu", "electrical").unwrap();
    m.create_item_in_domain("harness", "electrical").unwrap();
    m
}

#[test]
fn test_domains_own_isolated_defaults() {
    let m = drivetrain_matrix();
    let mech = m.get_domain_by_name("mechanical").unwrap().uid;
    let elec = m.get_domain_by_name("electrical").unwrap().uid;

    let mech_default = m.domain_groupings(mech).unwrap()[0].uid;
    let elec_default = m.domain_groupings(elec).unwrap()[0].uid;
    assert_ne!(mech_default, elec_default, "each domain owns its own default");

    for item in m.rows() {
        let expected = if item.domain == Some(mech) {
            mech_default
        } else {
            elec_default
        };
        assert_eq!(item.group, expected);
    }
}

#[test]
fn test_domain_grouping_crud_is_change_tracked() {
    let mut m = drivetrain_matrix();
    let mech = m.get_domain_by_name("mechanical").unwrap().uid;
    m.set_current_state_as_checkpoint();

    let g = m
        .add_domain_grouping(mech, "structure", Color::new(120, 120, 40), Color::BLACK)
        .unwrap();
    let axle = m.rows()[0].uid;
    m.set_item_group(axle, g).unwrap();
    m.set_current_state_as_checkpoint();
    assert_eq!(m.domain_groupings(mech).unwrap().len(), 2);

    m.undo_to_checkpoint();
    assert_eq!(m.domain_groupings(mech).unwrap().len(), 1);
    assert_ne!(m.get_item(axle).unwrap().group, g);

    m.redo_to_checkpoint();
    assert_eq!(m.get_item(axle).unwrap().group, g);
}

#[test]
fn test_remove_domain_grouping_empties_into_domain_default() {
    let mut m = drivetrain_matrix();
    let mech = m.get_domain_by_name("mechanical").unwrap().uid;
    let default = m.domain_groupings(mech).unwrap()[0].uid;
    let g = m
        .add_domain_grouping(mech, "structure", Color::WHITE, Color::BLACK)
        .unwrap();
    let axle = m.rows()[0].uid;
    m.set_item_group(axle, g).unwrap();

    m.remove_domain_grouping(mech, g).unwrap();
    assert_eq!(m.get_item(axle).unwrap().group, default);

    // The sentinel itself stays put.
    m.remove_domain_grouping(mech, default).unwrap();
    assert_eq!(m.domain_groupings(mech).unwrap().len(), 1);
}

#[test]
fn test_zoom_lifecycle_with_regrouping() {
    let mut m = drivetrain_matrix();
    let mech = m.get_domain_by_name("mechanical").unwrap().uid;
    let axle_row = m.rows()[0].uid;
    let frame_col = m.rows()[1].alias_uid.unwrap();
    m.modify_connection(axle_row, frame_col, "bolts", 1.0, Default::default());
    m.set_current_state_as_checkpoint();

    // Export the mechanical block, regroup it in isolation, merge back.
    let mut sub = m.export_zoom(mech, mech).unwrap();
    let cluster = sub
        .add_grouping("subframe", Color::new(10, 200, 10), Color::BLACK)
        .unwrap();
    sub.set_item_group(axle_row, cluster).unwrap();
    sub.set_item_name(axle_row, "rear axle").unwrap();

    m.import_zoom(&sub, mech, mech).unwrap();
    m.set_current_state_as_checkpoint();

    // The new grouping landed in the mechanical taxonomy.
    assert!(m
        .domain_groupings(mech)
        .unwrap()
        .iter()
        .any(|g| g.uid == cluster));
    let axle = m.get_item(axle_row).unwrap();
    assert_eq!(axle.group, cluster);
    assert_eq!(axle.name, "rear axle");
    // Alias mirrored through the merge.
    let axle_col = m.get_item_by_alias(axle.alias_uid.unwrap()).unwrap();
    assert_eq!(axle_col.group, cluster);
    assert_eq!(axle_col.name, "rear axle");
    // Untouched electrical block survives.
    assert_eq!(m.rows().len(), 4);
    assert!(m.get_connection(axle_row, frame_col).is_some());

    // The merge is one undoable operation.
    m.undo_to_checkpoint();
    assert_eq!(m.get_item(axle_row).unwrap().name, "axle");
    assert!(!m
        .domain_groupings(mech)
        .unwrap()
        .iter()
        .any(|g| g.uid == cluster));
}

#[test]
fn test_cross_domain_zoom_connection_block_replacement() {
    let mut m = drivetrain_matrix();
    let mech = m.get_domain_by_name("mechanical").unwrap().uid;
    let elec = m.get_domain_by_name("electrical").unwrap().uid;
    let axle_row = m.rows()[0].uid;
    let frame_row = m.rows()[1].uid;
    let ecu_col = m.rows()[2].alias_uid.unwrap();
    m.modify_connection(axle_row, ecu_col, "speed sensor", 2.0, Default::default());
    m.modify_connection(frame_row, ecu_col, "mount", 1.0, Default::default());

    let mut sub = m.export_zoom(mech, elec).unwrap();
    assert_eq!(sub.connection_count(), 2);
    sub.delete_connection(frame_row, ecu_col);
    sub.modify_connection(axle_row, ecu_col, "speed sensor", 4.0, Default::default());

    m.import_zoom(&sub, mech, elec).unwrap();
    assert!(m.get_connection(frame_row, ecu_col).is_none());
    assert_eq!(m.get_connection(axle_row, ecu_col).unwrap().weight, 4.0);
}
