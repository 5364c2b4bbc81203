use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use mcsg_kernel_geom::{process_line, Surface, SurfaceKind, SurfaceOps};
use mcsg_kernel_math::Tolerance;

use crate::RegistryError;

/// A registered surface and its transform tag.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceEntry {
    /// The surface geometry.
    pub surface: Surface,
    /// Transform number from the card, if any.
    pub transform: Option<i32>,
}

/// Owner of every surface in a model build, keyed by surface number.
///
/// Surfaces of each kind are also indexed by number, so a duplicate check
/// only compares against surfaces of the same kind. Null surfaces are never
/// merged: each stands in for a distinct failed card.
#[derive(Debug, Clone, Default)]
pub struct SurfIndex {
    surfaces: BTreeMap<i32, SurfaceEntry>,
    by_kind: BTreeMap<SurfaceKind, BTreeSet<i32>>,
    tol: Tolerance,
}

impl SurfIndex {
    /// Empty registry with default tolerances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry comparing surfaces within `tol.zero`.
    pub fn with_tolerance(tol: Tolerance) -> Self {
        Self {
            tol,
            ..Self::default()
        }
    }

    /// Tolerances in use.
    pub fn tolerance(&self) -> &Tolerance {
        &self.tol
    }

    /// Register `surface` as number `name`.
    ///
    /// Returns the canonical number: `name`, or the number of an equal
    /// surface with the same transform that is already registered.
    pub fn add_surface(
        &mut self,
        name: i32,
        transform: Option<i32>,
        surface: Surface,
    ) -> Result<i32, RegistryError> {
        if name <= 0 {
            return Err(RegistryError::InvalidName(name));
        }
        if let Some(existing) = self.find_equal(&surface, transform) {
            debug!("surface {name} duplicates {existing}; reusing {existing}");
            return Ok(existing);
        }
        if self.surfaces.contains_key(&name) {
            return Err(RegistryError::NameClash(name));
        }
        self.insert(name, SurfaceEntry { surface, transform });
        Ok(name)
    }

    /// Register `surface` under the first free number from `start`, unless
    /// an equal untransformed surface exists. Returns the canonical number.
    pub fn insert_unique(&mut self, start: i32, surface: Surface) -> i32 {
        if let Some(existing) = self.find_equal(&surface, None) {
            debug!("new surface duplicates {existing}; reusing it");
            return existing;
        }
        let name = self.next_free(start);
        self.insert(
            name,
            SurfaceEntry {
                surface,
                transform: None,
            },
        );
        name
    }

    /// Parse a numbered card and register it.
    ///
    /// Soft parse failures register a null surface under the card's
    /// number; hard failures are returned.
    pub fn process_card(&mut self, line: &str) -> Result<i32, RegistryError> {
        let card = process_line(line)?;
        self.add_surface(card.name, card.transform, card.surface)
    }

    /// The surface numbered `name`.
    pub fn get(&self, name: i32) -> Option<&Surface> {
        self.surfaces.get(&name).map(|e| &e.surface)
    }

    /// The entry numbered `name`, with its transform tag.
    pub fn entry(&self, name: i32) -> Option<&SurfaceEntry> {
        self.surfaces.get(&name)
    }

    /// Edit surface `name` in place and return what `f` returns.
    ///
    /// The kind index is brought up to date afterwards, so `f` may also
    /// replace the surface with one of another kind.
    pub fn modify<R>(
        &mut self,
        name: i32,
        f: impl FnOnce(&mut Surface) -> R,
    ) -> Result<R, RegistryError> {
        let entry = self
            .surfaces
            .get_mut(&name)
            .ok_or(RegistryError::NotFound(name))?;
        let before = entry.surface.kind();
        let out = f(&mut entry.surface);
        let after = entry.surface.kind();
        if before != after {
            debug!("surface {name} changed from {before} to {after}");
            self.unindex(name, before);
            self.by_kind.entry(after).or_default().insert(name);
        }
        Ok(out)
    }

    /// True if `name` is registered.
    pub fn contains(&self, name: i32) -> bool {
        self.surfaces.contains_key(&name)
    }

    /// Remove and return the entry numbered `name`.
    pub fn remove(&mut self, name: i32) -> Result<SurfaceEntry, RegistryError> {
        let entry = self
            .surfaces
            .remove(&name)
            .ok_or(RegistryError::NotFound(name))?;
        self.unindex(name, entry.surface.kind());
        Ok(entry)
    }

    /// Number of surfaces.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Entries in increasing surface number.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &SurfaceEntry)> {
        self.surfaces.iter().map(|(&n, e)| (n, e))
    }

    /// Numbers of the registered surfaces of one kind.
    pub fn names_of_kind(&self, kind: SurfaceKind) -> impl Iterator<Item = i32> + '_ {
        self.by_kind.get(&kind).into_iter().flatten().copied()
    }

    /// The first unused number at or above `start` (and at least 1).
    pub fn next_free(&self, start: i32) -> i32 {
        let mut name = start.max(1);
        while self.surfaces.contains_key(&name) {
            name += 1;
        }
        name
    }

    /// Move surface `old` to number `new`.
    pub fn renumber(&mut self, old: i32, new: i32) -> Result<(), RegistryError> {
        if new <= 0 {
            return Err(RegistryError::InvalidName(new));
        }
        if !self.surfaces.contains_key(&old) {
            return Err(RegistryError::NotFound(old));
        }
        if old == new {
            return Ok(());
        }
        if self.surfaces.contains_key(&new) {
            return Err(RegistryError::NameClash(new));
        }
        let entry = self.remove(old)?;
        self.insert(new, entry);
        Ok(())
    }

    /// Number of a registered surface equal to `surface` with the same
    /// transform tag.
    pub fn find_equal(&self, surface: &Surface, transform: Option<i32>) -> Option<i32> {
        if surface.is_null() {
            return None;
        }
        self.names_of_kind(surface.kind()).find(|n| {
            self.surfaces.get(n).is_some_and(|e| {
                e.transform == transform && e.surface.same_surface(surface, self.tol.zero)
            })
        })
    }

    /// Number of a plane that coincides with plane `name` but faces the
    /// other way.
    pub fn find_opposite(&self, name: i32) -> Option<i32> {
        let entry = self.surfaces.get(&name)?;
        let plane = entry.surface.as_plane()?;
        self.names_of_kind(SurfaceKind::Plane)
            .filter(|&n| n != name)
            .find(|n| {
                self.surfaces.get(n).is_some_and(|e| {
                    e.transform == entry.transform
                        && e.surface
                            .as_plane()
                            .is_some_and(|p| p.is_opposite(plane, self.tol.zero))
                })
            })
    }

    /// Fold plane `name` into its opposite, if one is registered.
    ///
    /// Returns the signed number to use in place of `name`: `-opposite`
    /// when `name` was removed, otherwise `name` itself.
    pub fn remove_opposite(&mut self, name: i32) -> i32 {
        match self.find_opposite(name) {
            Some(opposite) => {
                debug!("plane {name} is the reverse of {opposite}; removing it");
                self.surfaces.remove(&name);
                self.unindex(name, SurfaceKind::Plane);
                -opposite
            }
            None => name,
        }
    }

    fn insert(&mut self, name: i32, entry: SurfaceEntry) {
        self.by_kind
            .entry(entry.surface.kind())
            .or_default()
            .insert(name);
        self.surfaces.insert(name, entry);
    }

    fn unindex(&mut self, name: i32, kind: SurfaceKind) {
        if let Some(names) = self.by_kind.get_mut(&kind) {
            names.remove(&name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcsg_kernel_geom::SurfaceError;
    use mcsg_kernel_math::Vec3;

    fn surf(card: &str) -> Surface {
        card.parse().unwrap()
    }

    #[test]
    fn test_plane_dedup() {
        let mut index = SurfIndex::new();
        let a = index.add_surface(1, None, surf("p 1 0 0 5")).unwrap();
        let b = index.add_surface(2, None, surf("px 5")).unwrap();
        let c = index.add_surface(3, None, surf("p 2 0 0 10")).unwrap();
        assert_eq!((a, b, c), (1, 1, 1));
        assert_eq!(index.len(), 1);
        assert!(!index.contains(2));
    }

    #[test]
    fn test_dedup_respects_kind_and_transform() {
        let mut index = SurfIndex::new();
        assert_eq!(index.add_surface(1, None, surf("so 5")).unwrap(), 1);
        assert_eq!(index.add_surface(2, None, surf("cz 5")).unwrap(), 2);
        assert_eq!(index.add_surface(3, Some(4), surf("so 5")).unwrap(), 3);
        assert_eq!(index.add_surface(4, None, surf("s 0 0 0 5")).unwrap(), 1);
        assert_eq!(index.names_of_kind(SurfaceKind::Sphere).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_name_clash_and_invalid() {
        let mut index = SurfIndex::new();
        index.add_surface(7, None, surf("px 1")).unwrap();
        assert_eq!(
            index.add_surface(7, None, surf("py 1")),
            Err(RegistryError::NameClash(7))
        );
        assert_eq!(
            index.add_surface(0, None, surf("py 1")),
            Err(RegistryError::InvalidName(0))
        );
    }

    #[test]
    fn test_insert_unique_probes() {
        let mut index = SurfIndex::new();
        index.add_surface(100, None, surf("px 1")).unwrap();
        index.add_surface(101, None, surf("px 2")).unwrap();
        assert_eq!(index.next_free(100), 102);
        assert_eq!(index.insert_unique(100, surf("px 3")), 102);
        assert_eq!(index.insert_unique(100, surf("px 2")), 101);
        assert_eq!(index.next_free(-5), 1);
    }

    #[test]
    fn test_get_and_move() {
        let mut index = SurfIndex::new();
        index.add_surface(5, None, surf("so 2")).unwrap();
        index
            .modify(5, |s| s.displace(&Vec3::new(0.0, 0.0, 10.0)))
            .unwrap();
        assert_eq!(
            index.modify(6, |_| ()),
            Err(RegistryError::NotFound(6))
        );
        assert_eq!(index.get(5).unwrap().side(&mcsg_kernel_math::Point3::new(0.0, 0.0, 10.0)), -1);
        assert!(index.get(6).is_none());
        assert_eq!(index.entry(5).unwrap().transform, None);
    }

    #[test]
    fn test_modify_refiles_kind() {
        let mut index = SurfIndex::new();
        index.add_surface(1, None, surf("px 3")).unwrap();
        index.modify(1, |s| *s = surf("so 5")).unwrap();
        assert_eq!(index.names_of_kind(SurfaceKind::Plane).count(), 0);
        assert_eq!(index.names_of_kind(SurfaceKind::Sphere).collect::<Vec<_>>(), vec![1]);
        // the replaced surface is still found as a duplicate
        assert_eq!(index.add_surface(2, None, surf("so 5")).unwrap(), 1);
        assert_eq!(index.add_surface(3, None, surf("px 3")).unwrap(), 3);

        // same-kind edits leave the index alone
        index.modify(3, |s| s.displace(&Vec3::new(1.0, 0.0, 0.0))).unwrap();
        assert_eq!(index.find_equal(&surf("px 4"), None), Some(3));
    }

    #[test]
    fn test_remove_and_renumber() {
        let mut index = SurfIndex::new();
        index.add_surface(1, None, surf("px 1")).unwrap();
        index.add_surface(2, None, surf("py 1")).unwrap();
        assert_eq!(index.renumber(1, 2), Err(RegistryError::NameClash(2)));
        assert_eq!(index.renumber(9, 3), Err(RegistryError::NotFound(9)));
        index.renumber(1, 30).unwrap();
        assert!(index.contains(30) && !index.contains(1));
        assert_eq!(index.names_of_kind(SurfaceKind::Plane).collect::<Vec<_>>(), vec![2, 30]);

        let removed = index.remove(2).unwrap();
        assert!(removed.surface.as_plane().is_some());
        assert_eq!(index.remove(2), Err(RegistryError::NotFound(2)));
        assert_eq!(index.iter().map(|(n, _)| n).collect::<Vec<_>>(), vec![30]);
    }

    #[test]
    fn test_opposite_planes() {
        let mut index = SurfIndex::new();
        index.add_surface(1, None, surf("px 5")).unwrap();
        index.add_surface(2, None, surf("p -1 0 0 -5")).unwrap();
        index.add_surface(3, None, surf("py 5")).unwrap();
        assert_eq!(index.find_opposite(2), Some(1));
        assert_eq!(index.find_opposite(3), None);
        assert_eq!(index.remove_opposite(2), -1);
        assert!(!index.contains(2));
        assert_eq!(index.remove_opposite(3), 3);
        assert_eq!(index.remove_opposite(1), 1);
    }

    #[test]
    fn test_process_card() {
        let mut index = SurfIndex::new();
        assert_eq!(index.process_card("10 px 5").unwrap(), 10);
        assert_eq!(index.process_card("11 3 cz 2 $ transformed").unwrap(), 11);
        assert_eq!(index.entry(11).unwrap().transform, Some(3));

        // soft failures keep their number as null surfaces
        assert_eq!(index.process_card("12 so -1").unwrap(), 12);
        assert_eq!(index.process_card("13 px a").unwrap(), 13);
        assert!(index.get(12).unwrap().is_null());
        assert!(index.get(13).unwrap().is_null());

        let hard = index.process_card("14 zz 1 2 3");
        assert!(matches!(
            hard,
            Err(RegistryError::Card(SurfaceError::UnknownKey(_)))
        ));
        assert!(!index.contains(14));
    }

    #[test]
    fn test_with_tolerance() {
        let mut index = SurfIndex::with_tolerance(Tolerance::DEFAULT.with_zero(0.1));
        index.add_surface(1, None, surf("px 5")).unwrap();
        assert_eq!(index.add_surface(2, None, surf("px 5.05")).unwrap(), 1);
        assert_eq!(index.tolerance().zero, 0.1);
        let mut strict = SurfIndex::new();
        strict.add_surface(1, None, surf("px 5")).unwrap();
        assert_eq!(strict.add_surface(2, None, surf("px 5.05")).unwrap(), 2);
    }
}
