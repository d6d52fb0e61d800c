use std::collections::HashMap;
use std::hash::Hash;

/// Bucket `items` by the key `key` extracts, in one pass.
///
/// Groups appear in the order their key was first seen and items keep their
/// relative order inside a group.
pub fn group_by_key<I, T, K, F>(items: I, mut key: F) -> Vec<(K, Vec<T>)>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();

    for item in items {
        let k = key(&item);
        match slots.get(&k) {
            Some(&i) => groups[i].1.push(item),
            None => {
                slots.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }

    groups
}
