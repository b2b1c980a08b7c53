//! Form-state operations on a resume's section list.
//!
//! All functions work on a plain `Vec<Section>` and leave `order_index`
//! equal to the vector position when they return.

use uuid::Uuid;

use crate::errors::{AppError, FieldError};
use crate::models::draft::ResumeDraft;
use crate::models::resume::{Section, SectionContent, SectionKind};

pub const NEW_SECTION_HEADER: &str = "New Section";

/// The eleven empty sections a new resume starts with, in canonical order.
pub fn default_sections() -> Vec<Section> {
    let mut sections: Vec<Section> = SectionKind::ALL.into_iter().map(Section::empty).collect();
    normalize_order(&mut sections);
    sections
}

pub fn normalize_order(sections: &mut [Section]) {
    for (i, section) in sections.iter_mut().enumerate() {
        section.order_index = u32::try_from(i).unwrap_or(u32::MAX);
    }
}

/// Appends an empty section of `kind`. Returns the new section's id.
pub fn add_section(sections: &mut Vec<Section>, kind: SectionKind, header: Option<&str>) -> Uuid {
    let header = header
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .unwrap_or(NEW_SECTION_HEADER);
    let section = Section::new(header, SectionContent::empty(kind));
    let id = section.id;
    sections.push(section);
    normalize_order(sections);
    id
}

fn find_mut(sections: &mut [Section], id: Uuid) -> Result<&mut Section, AppError> {
    sections
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Section {id} not found")))
}

/// Replaces a section's body. The section kind cannot change.
pub fn update_section_content(
    sections: &mut [Section],
    id: Uuid,
    content: SectionContent,
) -> Result<(), AppError> {
    let section = find_mut(sections, id)?;
    if section.kind() != content.kind() {
        return Err(AppError::BadRequest(format!(
            "Section {id} is of type '{}' and cannot hold '{}' content",
            section.kind().as_str(),
            content.kind().as_str()
        )));
    }
    section.content = content;
    Ok(())
}

pub fn update_section_header(
    sections: &mut [Section],
    id: Uuid,
    header: &str,
) -> Result<(), AppError> {
    let section = find_mut(sections, id)?;
    section.header = header.trim().to_string();
    Ok(())
}

pub fn remove_section(sections: &mut Vec<Section>, id: Uuid) -> Result<Section, AppError> {
    let pos = sections
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Section {id} not found")))?;
    let removed = sections.remove(pos);
    normalize_order(sections);
    Ok(removed)
}

/// Moves the section at `old_index` to `new_index`, shifting the ones in between.
pub fn reorder_sections(
    sections: &mut [Section],
    old_index: usize,
    new_index: usize,
) -> Result<(), AppError> {
    let len = sections.len();
    let mut errors = Vec::new();
    for (field, index) in [("old_index", old_index), ("new_index", new_index)] {
        if index >= len {
            errors.push(FieldError::new(
                field,
                format!("must be less than the number of sections ({len})"),
            ));
        }
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    if old_index < new_index {
        sections[old_index..=new_index].rotate_left(1);
    } else {
        sections[new_index..=old_index].rotate_right(1);
    }
    normalize_order(sections);
    Ok(())
}

/// Merges a draft into the sections by kind. The first section of a matching kind
/// takes the draft content; missing kinds are appended with their default header.
/// Returns how many sections were written.
pub fn apply_draft(sections: &mut Vec<Section>, draft: &ResumeDraft) -> usize {
    let contents = draft.to_contents();
    let written = contents.len();

    for content in contents {
        let kind = content.kind();
        match sections.iter_mut().find(|s| s.kind() == kind) {
            Some(existing) => existing.content = content,
            None => sections.push(Section::new(kind.default_header(), content)),
        }
    }
    normalize_order(sections);
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sections::{ExperienceItem, SkillItem};

    fn kinds(sections: &[Section]) -> Vec<SectionKind> {
        sections.iter().map(Section::kind).collect()
    }

    fn assert_normalized(sections: &[Section]) {
        for (i, s) in sections.iter().enumerate() {
            assert_eq!(s.order_index as usize, i);
        }
    }

    #[test]
    fn test_default_sections_canonical_order_and_headers() {
        let sections = default_sections();
        assert_eq!(kinds(&sections), SectionKind::ALL.to_vec());
        assert_eq!(sections[0].header, "Personal Information");
        assert_eq!(sections[8].header, "Awards & Achievements");
        assert_normalized(&sections);
    }

    #[test]
    fn test_add_section_defaults_header() {
        let mut sections = default_sections();
        let id = add_section(&mut sections, SectionKind::Projects, None);
        let added = sections.last().unwrap();
        assert_eq!(added.id, id);
        assert_eq!(added.header, NEW_SECTION_HEADER);
        assert_eq!(added.order_index, 11);

        add_section(&mut sections, SectionKind::Skills, Some("  Tools "));
        assert_eq!(sections.last().unwrap().header, "Tools");
    }

    #[test]
    fn test_update_content_rejects_kind_change() {
        let mut sections = default_sections();
        let id = sections[1].id;
        update_section_content(&mut sections, id, SectionContent::Summary("Hi".into())).unwrap();
        assert_eq!(sections[1].content, SectionContent::Summary("Hi".into()));

        let err = update_section_content(&mut sections, id, SectionContent::Skills(vec![]));
        assert!(matches!(err, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_unknown_section_is_not_found() {
        let mut sections = default_sections();
        let missing = Uuid::new_v4();
        assert!(matches!(
            update_section_header(&mut sections, missing, "x"),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            remove_section(&mut sections, missing),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_section_renormalizes() {
        let mut sections = default_sections();
        let id = sections[3].id;
        let removed = remove_section(&mut sections, id).unwrap();
        assert_eq!(removed.kind(), SectionKind::Education);
        assert_eq!(sections.len(), 10);
        assert_normalized(&sections);
    }

    #[test]
    fn test_reorder_moves_forward_and_backward() {
        let mut sections = default_sections();
        reorder_sections(&mut sections, 0, 2).unwrap();
        assert_eq!(
            kinds(&sections)[..3],
            [SectionKind::Summary, SectionKind::Experience, SectionKind::Personal]
        );
        assert_normalized(&sections);

        reorder_sections(&mut sections, 2, 0).unwrap();
        assert_eq!(kinds(&sections), SectionKind::ALL.to_vec());
    }

    #[test]
    fn test_reorder_same_index_is_noop() {
        let mut sections = default_sections();
        reorder_sections(&mut sections, 4, 4).unwrap();
        assert_eq!(kinds(&sections), SectionKind::ALL.to_vec());
    }

    #[test]
    fn test_reorder_out_of_range() {
        let mut sections = default_sections();
        match reorder_sections(&mut sections, 0, 11) {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "new_index");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_apply_draft_fills_matching_and_appends_missing() {
        let mut sections = vec![
            Section::new("About", SectionContent::Summary("old".into())),
            Section::new("Jobs", SectionContent::Experience(vec![])),
        ];
        let summary_id = sections[0].id;
        let draft = ResumeDraft {
            summary: Some("new".into()),
            experiences: vec![ExperienceItem {
                company: "Acme".into(),
                ..Default::default()
            }],
            skills: vec![SkillItem {
                name: "Rust".into(),
                ..Default::default()
            }],
            ..Default::default()
        };

        assert_eq!(apply_draft(&mut sections, &draft), 3);
        assert_eq!(sections[0].id, summary_id);
        assert_eq!(sections[0].header, "About");
        assert_eq!(sections[0].content, SectionContent::Summary("new".into()));
        assert_eq!(sections[1].content.item_count(), 1);
        assert_eq!(sections[2].kind(), SectionKind::Skills);
        assert_eq!(sections[2].header, "Technical Skills");
        assert_normalized(&sections);
    }

    #[test]
    fn test_apply_empty_draft_changes_nothing() {
        let mut sections = vec![Section::new("About", SectionContent::Summary("keep".into()))];
        let before = sections.clone();
        assert_eq!(apply_draft(&mut sections, &ResumeDraft::default()), 0);
        assert_eq!(sections, before);
    }
}
