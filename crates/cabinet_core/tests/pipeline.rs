use cabinet_core::db::{load_table, open, replace_table};
use cabinet_core::fetch::{parse_csv, parse_json};
use cabinet_core::mapper::{map_position_rows, map_rows};
use cabinet_core::{Membership, Position};
use tempfile::tempdir;

const CABINET_JSON: &str = r#"{
  "head": {"vars": ["ps","item","itemLabel","minister","ministerLabel","ordinal","start","startprecision","end","endprecision"]},
  "results": {"bindings": [
    {
      "item": {"type": "uri", "value": "http://www.wikidata.org/entity/Q2"},
      "itemLabel": {"xml:lang": "en", "type": "literal", "value": "Gerhard Schröder"},
      "ps": {"type": "uri", "value": "http://www.wikidata.org/entity/statement/Q2-aaaa"},
      "minister": {"type": "uri", "value": "http://www.wikidata.org/entity/Q4970706"},
      "ministerLabel": {"xml:lang": "en", "type": "literal", "value": "Federal Chancellor of Germany"},
      "ordinal": {"type": "literal", "value": "7"},
      "start": {"type": "literal", "value": "1998-10-27T00:00:00Z"},
      "startprecision": {"type": "literal", "value": "11"},
      "end": {"type": "literal", "value": "2005-11-22T00:00:00Z"},
      "endprecision": {"type": "literal", "value": "11"}
    },
    {
      "item": {"type": "uri", "value": "http://www.wikidata.org/entity/Q567"},
      "itemLabel": {"xml:lang": "en", "type": "literal", "value": "Angela Merkel"},
      "ps": {"type": "uri", "value": "http://www.wikidata.org/entity/statement/Q567-bbbb"},
      "minister": {"type": "uri", "value": "http://www.wikidata.org/entity/Q4970706"},
      "start": {"type": "literal", "value": "2005-11-22T00:00:00Z"},
      "startprecision": {"type": "literal", "value": "9"}
    },
    {
      "item": {"type": "uri", "value": "http://www.wikidata.org/entity/Q567"},
      "ps": {"type": "uri", "value": "http://www.wikidata.org/entity/statement/Q567-cccc"},
      "minister": {"type": "uri", "value": "http://www.wikidata.org/entity/Q1939555"},
      "start": {"type": "literal", "value": "1994-11-17T00:00:00Z"},
      "startprecision": {"type": "literal", "value": "7"}
    }
  ]}
}"#;

#[test]
fn json_rows_are_mapped_and_persisted_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.sqlite");
    let mut conn = open(path.to_str().unwrap()).unwrap();

    let memberships = map_rows(&parse_json(CABINET_JSON).unwrap());
    assert_eq!(memberships.len(), 3);
    assert_eq!(memberships[1].start_date.as_deref(), Some("2005"));
    assert_eq!(memberships[1].ordinal, 0);
    assert_eq!(memberships[2].start_date, None);
    assert_eq!(memberships[2].label, None);

    replace_table(&mut conn, "data", &["position_id"], &memberships).unwrap();
    assert_eq!(load_table::<Membership>(&conn, "data").unwrap(), memberships);
}

#[test]
fn rerun_replaces_previous_table() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.sqlite");
    let mut conn = open(path.to_str().unwrap()).unwrap();

    let memberships = map_rows(&parse_json(CABINET_JSON).unwrap());
    replace_table(&mut conn, "data", &["position_id"], &memberships).unwrap();
    replace_table(&mut conn, "data", &["position_id"], &memberships[..1]).unwrap();

    let stored = load_table::<Membership>(&conn, "data").unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id.as_deref(), Some("Q2"));
}

#[test]
fn duplicate_keys_keep_last_row() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.sqlite");
    let mut conn = open(path.to_str().unwrap()).unwrap();

    let memberships = map_rows(&parse_json(CABINET_JSON).unwrap());
    replace_table(&mut conn, "data", &["id"], &memberships).unwrap();

    let stored = load_table::<Membership>(&conn, "data").unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[1].position_id.as_deref(), Some("Q567-cccc"));
}

#[test]
fn absent_keys_never_collide() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.sqlite");
    let mut conn = open(path.to_str().unwrap()).unwrap();

    let rows = vec![Membership::default(), Membership::default()];
    replace_table(&mut conn, "data", &["id"], &rows).unwrap();
    assert_eq!(load_table::<Membership>(&conn, "data").unwrap().len(), 2);
}

#[test]
fn csv_and_json_responses_map_identically() {
    let csv = "ps,item,itemLabel,minister,ministerLabel,ordinal,start,startprecision,end,endprecision\n\
               http://www.wikidata.org/entity/statement/Q2-aaaa,http://www.wikidata.org/entity/Q2,Gerhard Schröder,http://www.wikidata.org/entity/Q4970706,Federal Chancellor of Germany,7,1998-10-27T00:00:00Z,11,2005-11-22T00:00:00Z,11\n";
    let from_csv = map_rows(&parse_csv(csv).unwrap());
    let from_json = map_rows(&parse_json(CABINET_JSON).unwrap());
    assert_eq!(from_csv[0], from_json[0]);
}

#[test]
fn empty_result_persists_empty_table() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.sqlite");
    let mut conn = open(path.to_str().unwrap()).unwrap();

    let memberships = map_rows(&parse_json(r#"{"results": {"bindings": []}}"#).unwrap());
    assert!(memberships.is_empty());
    replace_table(&mut conn, "cabinet", &["id", "position_id"], &memberships).unwrap();
    assert!(load_table::<Membership>(&conn, "cabinet").unwrap().is_empty());
}

const PEOPLE_JSON: &str = r#"{
  "results": {"bindings": [
    {
      "item": {"type": "uri", "value": "http://www.wikidata.org/entity/Q567"},
      "ps": {"type": "uri", "value": "http://www.wikidata.org/entity/statement/Q567-dddd"},
      "minister": {"type": "uri", "value": "http://www.wikidata.org/entity/Q1939555"},
      "ministerDescription": {"xml:lang": "en", "type": "literal", "value": "member of the German federal parliament"},
      "party": {"type": "uri", "value": "http://www.wikidata.org/entity/Q49762"},
      "term": {"type": "uri", "value": "http://www.wikidata.org/entity/Q15835236"},
      "qualifiers": {"type": "literal", "value": "P102 P2937"}
    },
    {
      "item": {"type": "uri", "value": "http://www.wikidata.org/entity/Q567"},
      "ps": {"type": "uri", "value": "http://www.wikidata.org/entity/statement/Q567-eeee"},
      "minister": {"type": "uri", "value": "http://www.wikidata.org/entity/Q1939555"},
      "start": {"type": "literal", "value": "2002-10-17T00:00:00Z"},
      "startprecision": {"type": "literal", "value": "11"},
      "constituency": {"type": "uri", "value": "http://www.wikidata.org/entity/Q1413563"},
      "qualifiers": {"type": "literal", "value": "P580 P768 P5054"}
    }
  ]}
}"#;

#[test]
fn people_positions_keep_qualifiers_and_key_on_start_date() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.sqlite");
    let mut conn = open(path.to_str().unwrap()).unwrap();

    let positions = map_position_rows(&parse_json(PEOPLE_JSON).unwrap());
    assert_eq!(positions[0].start_date, "");
    assert_eq!(positions[0].party.as_deref(), Some("Q49762"));
    assert_eq!(positions[1].start_date, "2002-10-17");

    replace_table(&mut conn, "data", &["id", "position", "start_date"], &positions).unwrap();
    let stored = load_table::<Position>(&conn, "data").unwrap();
    assert_eq!(stored, positions);
    assert_eq!(stored[1].constituency.as_deref(), Some("Q1413563"));
}
