//! Writers for the two output files.
//!
//! Both outputs are written to a temporary file next to the target and
//! renamed over it, so a crashed call never leaves a partially written
//! state behind.

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crowdmech_contact::{ContactBook, ContactKey, ContactRecord};
use crowdmech_math::Vec2;
use crowdmech_model::{Model, State};

use crate::Result;

fn fmt_vec2(v: &Vec2) -> String {
    format!("{},{}", v.x, v.y)
}

fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);
    fs::write(tmp, bytes)?;
    fs::rename(tmp, path)?;
    Ok(())
}

/// Write the output agent dynamics file: the input format minus the
/// `<Dynamics>` element.
pub fn write_dynamics(path: &Path, model: &Model, state: &State) -> Result<()> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("Agents")))?;

    for (def, st) in model.agents.iter().zip(&state.agents) {
        let mut agent = BytesStart::new("Agent");
        agent.push_attribute(("Id", def.id.to_string().as_str()));
        writer.write_event(Event::Start(agent))?;

        let mut kin = BytesStart::new("Kinematics");
        kin.push_attribute(("Position", fmt_vec2(&st.position).as_str()));
        kin.push_attribute(("Velocity", fmt_vec2(&st.velocity).as_str()));
        kin.push_attribute(("Theta", st.theta.to_string().as_str()));
        kin.push_attribute(("Omega", st.omega.to_string().as_str()));
        writer.write_event(Event::Empty(kin))?;

        writer.write_event(Event::End(BytesEnd::new("Agent")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("Agents")))?;
    atomic_write(path, &writer.into_inner())
}

fn push_record_attrs(elem: &mut BytesStart, rec: &ContactRecord) {
    elem.push_attribute((
        "TangentialRelativeDisplacement",
        fmt_vec2(&rec.xi).as_str(),
    ));
    elem.push_attribute(("Fn", fmt_vec2(&rec.normal_force).as_str()));
    elem.push_attribute(("Ft", fmt_vec2(&rec.tangential_force).as_str()));
}

/// Write the interactions file: per parent agent, the agent-agent
/// records grouped by child agent followed by the wall records.
pub fn write_interactions(path: &Path, model: &Model, book: &ContactBook) -> Result<()> {
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct ParentGroup<'a> {
        // child index -> records of that pair, in key order
        children: BTreeMap<usize, Vec<(usize, usize, &'a ContactRecord)>>,
        walls: Vec<(usize, usize, usize, &'a ContactRecord)>,
    }

    let mut grouped: BTreeMap<usize, ParentGroup> = BTreeMap::new();
    for (key, rec) in book.iter() {
        match *key {
            ContactKey::AgentAgent { i, j, sa, sb } => {
                grouped
                    .entry(i)
                    .or_default()
                    .children
                    .entry(j)
                    .or_default()
                    .push((sa, sb, rec));
            }
            ContactKey::AgentWall { i, s, wall, corner } => {
                grouped
                    .entry(i)
                    .or_default()
                    .walls
                    .push((s, wall, corner, rec));
            }
        }
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("Agents")))?;

    for (parent, group) in &grouped {
        let mut outer = BytesStart::new("Agent");
        outer.push_attribute(("Id", model.agents[*parent].id.to_string().as_str()));
        writer.write_event(Event::Start(outer))?;

        for (child, records) in &group.children {
            let mut inner = BytesStart::new("Agent");
            inner.push_attribute(("Id", model.agents[*child].id.to_string().as_str()));
            writer.write_event(Event::Start(inner))?;
            for (sa, sb, rec) in records {
                let mut elem = BytesStart::new("Interaction");
                elem.push_attribute(("ParentShape", sa.to_string().as_str()));
                elem.push_attribute(("ChildShape", sb.to_string().as_str()));
                push_record_attrs(&mut elem, rec);
                writer.write_event(Event::Empty(elem))?;
            }
            writer.write_event(Event::End(BytesEnd::new("Agent")))?;
        }

        for (s, wall, corner, rec) in &group.walls {
            let mut elem = BytesStart::new("Wall");
            elem.push_attribute(("ShapeId", s.to_string().as_str()));
            elem.push_attribute(("WallId", model.walls[*wall].id.to_string().as_str()));
            elem.push_attribute(("CornerId", corner.to_string().as_str()));
            push_record_attrs(&mut elem, rec);
            writer.write_event(Event::Empty(elem))?;
        }

        writer.write_event(Event::End(BytesEnd::new("Agent")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("Agents")))?;
    atomic_write(path, &writer.into_inner())
}
